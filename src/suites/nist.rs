//! SP800-38A known-answer suite.
//!
//! The published NIST example vectors: four reference blocks encrypted
//! under one key per key size, for every supported mode. Unlike the
//! CAVP suite there is nothing to parse; the tables below are the
//! authority and each (algorithm, mode) pair is sent to the tool as a
//! single multi-block input.

use log::{error, info};
use once_cell::sync::Lazy;

use crate::model::{Algorithm, BlockInput, Direction, Mode, Outcome, RunSummary};
use crate::suites::cavp::engine::verify_output;
use crate::tools::BlockTool;

const PLAINTEXTS: [&str; 4] = [
    "6bc1bee22e409f96e93d7e117393172a",
    "ae2d8a571e03ac9c9eb76fac45af8e51",
    "30c81c46a35ce411e5fbc1191a0a52ef",
    "f69f2445df4f9b17ad2b417be66c3710",
];

const DEFAULT_IV: &str = "000102030405060708090a0b0c0d0e0f";
const CTR_IV: &str = "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";

fn key(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::Aes128 => "2b7e151628aed2a6abf7158809cf4f3c",
        Algorithm::Aes192 => "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        Algorithm::Aes256 => "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
    }
}

fn init_vector(mode: Mode) -> Option<&'static str> {
    if !mode.requires_init_vector() {
        return None;
    }
    Some(match mode {
        Mode::Ctr => CTR_IV,
        _ => DEFAULT_IV,
    })
}

#[rustfmt::skip]
fn ciphertexts(algorithm: Algorithm, mode: Mode) -> [&'static str; 4] {
    match (algorithm, mode) {
        (Algorithm::Aes128, Mode::Ecb) => [
            "3ad77bb40d7a3660a89ecaf32466ef97",
            "f5d3d58503b9699de785895a96fdbaaf",
            "43b1cd7f598ece23881b00e3ed030688",
            "7b0c785e27e8ad3f8223207104725dd4",
        ],
        (Algorithm::Aes128, Mode::Cbc) => [
            "7649abac8119b246cee98e9b12e9197d",
            "5086cb9b507219ee95db113a917678b2",
            "73bed6b8e3c1743b7116e69e22229516",
            "3ff1caa1681fac09120eca307586e1a7",
        ],
        (Algorithm::Aes128, Mode::Cfb) => [
            "3b3fd92eb72dad20333449f8e83cfb4a",
            "c8a64537a0b3a93fcde3cdad9f1ce58b",
            "26751f67a3cbb140b1808cf187a4f4df",
            "c04b05357c5d1c0eeac4c66f9ff7f2e6",
        ],
        (Algorithm::Aes128, Mode::Ofb) => [
            "3b3fd92eb72dad20333449f8e83cfb4a",
            "7789508d16918f03f53c52dac54ed825",
            "9740051e9c5fecf64344f7a82260edcc",
            "304c6528f659c77866a510d9c1d6ae5e",
        ],
        (Algorithm::Aes128, Mode::Ctr) => [
            "874d6191b620e3261bef6864990db6ce",
            "9806f66b7970fdff8617187bb9fffdff",
            "5ae4df3edbd5d35e5b4f09020db03eab",
            "1e031dda2fbe03d1792170a0f3009cee",
        ],
        (Algorithm::Aes192, Mode::Ecb) => [
            "bd334f1d6e45f25ff712a214571fa5cc",
            "974104846d0ad3ad7734ecb3ecee4eef",
            "ef7afd2270e2e60adce0ba2face6444e",
            "9a4b41ba738d6c72fb16691603c18e0e",
        ],
        (Algorithm::Aes192, Mode::Cbc) => [
            "4f021db243bc633d7178183a9fa071e8",
            "b4d9ada9ad7dedf4e5e738763f69145a",
            "571b242012fb7ae07fa9baac3df102e0",
            "08b0e27988598881d920a9e64f5615cd",
        ],
        (Algorithm::Aes192, Mode::Cfb) => [
            "cdc80d6fddf18cab34c25909c99a4174",
            "67ce7f7f81173621961a2b70171d3d7a",
            "2e1e8a1dd59b88b1c8e60fed1efac4c9",
            "c05f9f9ca9834fa042ae8fba584b09ff",
        ],
        (Algorithm::Aes192, Mode::Ofb) => [
            "cdc80d6fddf18cab34c25909c99a4174",
            "fcc28b8d4c63837c09e81700c1100401",
            "8d9a9aeac0f6596f559c6d4daf59a5f2",
            "6d9f200857ca6c3e9cac524bd9acc92a",
        ],
        (Algorithm::Aes192, Mode::Ctr) => [
            "1abc932417521ca24f2b0459fe7e6e0b",
            "090339ec0aa6faefd5ccc2c6f4ce8e94",
            "1e36b26bd1ebc670d1bd1d665620abf7",
            "4f78a7f6d29809585a97daec58c6b050",
        ],
        (Algorithm::Aes256, Mode::Ecb) => [
            "f3eed1bdb5d2a03c064b5a7e3db181f8",
            "591ccb10d410ed26dc5ba74a31362870",
            "b6ed21b99ca6f4f9f153e7b1beafed1d",
            "23304b7a39f9f3ff067d8d8f9e24ecc7",
        ],
        (Algorithm::Aes256, Mode::Cbc) => [
            "f58c4c04d6e5f1ba779eabfb5f7bfbd6",
            "9cfc4e967edb808d679f777bc6702c7d",
            "39f23369a9d9bacfa530e26304231461",
            "b2eb05e2c39be9fcda6c19078c6a9d1b",
        ],
        (Algorithm::Aes256, Mode::Cfb) => [
            "dc7e84bfda79164b7ecd8486985d3860",
            "39ffed143b28b1c832113c6331e5407b",
            "df10132415e54b92a13ed0a8267ae2f9",
            "75a385741ab9cef82031623d55b1e471",
        ],
        (Algorithm::Aes256, Mode::Ofb) => [
            "dc7e84bfda79164b7ecd8486985d3860",
            "4febdc6740d20b3ac88f6ad82a4fb08d",
            "71ab47a086e86eedf39d1c5bba97c408",
            "0126141d67f37be8538f5a8be740e484",
        ],
        (Algorithm::Aes256, Mode::Ctr) => [
            "601ec313775789a5b7a7f504bbf3d228",
            "f443e3ca4d62b59aca84e990cacaf5c5",
            "2b0930daa23de94ce87017ba2d84988d",
            "dfc9c58db67aada613c2dd08457941a6",
        ],
    }
}

/// One (algorithm, mode) known-answer case.
#[derive(Debug, Clone)]
pub struct KnownAnswer {
    pub algorithm: Algorithm,
    pub mode: Mode,
    pub key: &'static str,
    pub iv: Option<&'static str>,
    pub plaintexts: [&'static str; 4],
    pub ciphertexts: [&'static str; 4],
}

/// Every supported (algorithm, mode) pair with its published values.
pub static KNOWN_ANSWERS: Lazy<Vec<KnownAnswer>> = Lazy::new(|| {
    let mut cases = Vec::with_capacity(Algorithm::ALL.len() * Mode::ALL.len());
    for algorithm in Algorithm::ALL {
        for mode in Mode::ALL {
            cases.push(KnownAnswer {
                algorithm,
                mode,
                key: key(algorithm),
                iv: init_vector(mode),
                plaintexts: PLAINTEXTS,
                ciphertexts: ciphertexts(algorithm, mode),
            });
        }
    }
    cases
});

fn run_case(tool: &dyn BlockTool, case: &KnownAnswer, direction: Direction) -> Outcome {
    info!("Running {} test...", direction);
    info!("Algorithm: {}", case.algorithm);
    info!("Mode: {}", case.mode);

    let (texts, expected) = match direction {
        Direction::Encrypt => (case.plaintexts, case.ciphertexts),
        Direction::Decrypt => (case.ciphertexts, case.plaintexts),
    };
    let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    let input = BlockInput::new(
        case.key,
        texts.iter().map(|s| s.to_string()).collect(),
        case.iv.map(str::to_string),
    );

    match tool.run_block(direction, case.algorithm, case.mode, &[input]) {
        Ok(actual) => {
            if verify_output(&actual, &expected) {
                Outcome::Success
            } else {
                Outcome::Failure
            }
        }
        Err(e) => {
            error!("Encountered an exception!");
            error!("{}", e);
            Outcome::Error
        }
    }
}

/// Runs both directions of every known-answer case and tallies the
/// outcomes.
pub fn run(tool: &dyn BlockTool) -> RunSummary {
    let mut summary = RunSummary::default();
    for case in KNOWN_ANSWERS.iter() {
        summary.record(run_case(tool, case, Direction::Encrypt));
        summary.record(run_case(tool, case, Direction::Decrypt));
    }
    summary.log_totals();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_pair() {
        assert_eq!(KNOWN_ANSWERS.len(), 15);
        for case in KNOWN_ANSWERS.iter() {
            assert_eq!(case.iv.is_some(), case.mode.requires_init_vector());
            for value in case.plaintexts.iter().chain(case.ciphertexts.iter()) {
                assert_eq!(hex::decode(value).unwrap().len(), 16);
            }
        }
    }

    #[test]
    fn ecb_and_ctr_reference_values() {
        let ecb = KNOWN_ANSWERS
            .iter()
            .find(|c| c.algorithm == Algorithm::Aes128 && c.mode == Mode::Ecb)
            .unwrap();
        assert_eq!(ecb.key, "2b7e151628aed2a6abf7158809cf4f3c");
        assert_eq!(ecb.ciphertexts[0], "3ad77bb40d7a3660a89ecaf32466ef97");

        let ctr = KNOWN_ANSWERS
            .iter()
            .find(|c| c.algorithm == Algorithm::Aes256 && c.mode == Mode::Ctr)
            .unwrap();
        assert_eq!(ctr.iv, Some(CTR_IV));
    }
}
