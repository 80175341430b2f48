//! Shared data model for the conformance suites.
//!
//! Mirrors the vocabulary of the external tools: an algorithm token, a
//! mode-of-operation token, and a batch input of hex-encoded blocks.

use std::fmt;

use log::info;

/// Supported cipher, derived from the `aes<keysize>` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Aes128,
    Aes192,
    Aes256,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Aes128, Algorithm::Aes192, Algorithm::Aes256];

    /// Parses the canonical lowercase token (`aes128`, ...), accepting
    /// any ASCII case. Returns `None` for anything unsupported.
    pub fn try_parse(s: &str) -> Option<Algorithm> {
        match s.to_ascii_lowercase().as_str() {
            "aes128" => Some(Algorithm::Aes128),
            "aes192" => Some(Algorithm::Aes192),
            "aes256" => Some(Algorithm::Aes256),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Aes128 => "aes128",
            Algorithm::Aes192 => "aes192",
            Algorithm::Aes256 => "aes256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode of operation. Every mode except ECB chains blocks and therefore
/// needs an initialization vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Ecb,
    Cbc,
    Cfb,
    Ofb,
    Ctr,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Ecb, Mode::Cbc, Mode::Cfb, Mode::Ofb, Mode::Ctr];

    /// Parses a mode token, case-insensitively. `cfb128` is a recognized
    /// alias for CFB (the CAVP archives name full-block CFB that way).
    pub fn try_parse(s: &str) -> Option<Mode> {
        match s.to_ascii_lowercase().as_str() {
            "ecb" => Some(Mode::Ecb),
            "cbc" => Some(Mode::Cbc),
            "cfb" | "cfb128" => Some(Mode::Cfb),
            "ofb" => Some(Mode::Ofb),
            "ctr" => Some(Mode::Ctr),
            _ => None,
        }
    }

    pub fn requires_init_vector(&self) -> bool {
        *self != Mode::Ecb
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ecb => "ecb",
            Mode::Cbc => "cbc",
            Mode::Cfb => "cfb",
            Mode::Ofb => "ofb",
            Mode::Ctr => "ctr",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a run drives the encryption or the decryption tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Encrypt => "encryption",
            Direction::Decrypt => "decryption",
        })
    }
}

/// One unit of work for the external tool: a key, the blocks to process
/// under that key, and the IV when the mode takes one.
///
/// CAVP vectors carry one block per case, so the suite wraps each case
/// in a single-text input; the SP800-38A suite sends all four reference
/// blocks under one key in one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInput {
    pub key: String,
    pub texts: Vec<String>,
    pub iv: Option<String>,
}

impl BlockInput {
    pub fn new(key: impl Into<String>, texts: Vec<String>, iv: Option<String>) -> Self {
        Self {
            key: key.into(),
            texts,
            iv,
        }
    }

    /// Positional argument form understood by the tools: key, then the
    /// IV if present, then every text.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(2 + self.texts.len());
        args.push(self.key.clone());
        if let Some(iv) = &self.iv {
            args.push(iv.clone());
        }
        args.extend(self.texts.iter().cloned());
        args
    }
}

/// Verdict for one file/direction (or one known-answer case).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Error,
    Skipped,
}

/// Per-run tally of outcomes. The aggregator is the only writer; the
/// final counts decide the process exit status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.succeeded += 1,
            Outcome::Failure => self.failed += 1,
            Outcome::Error => self.errors += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    /// True iff nothing errored and nothing failed. Skipped files never
    /// affect the verdict.
    pub fn all_passed(&self) -> bool {
        self.errors == 0 && self.failed == 0
    }

    pub fn log_totals(&self) {
        info!("Test outcomes:");
        info!("\tSkipped:   {}", self.skipped);
        info!("\tError(s):  {}", self.errors);
        info!("\tSucceeded: {}", self.succeeded);
        info!("\tFailed:    {}", self.failed);
    }
}
