//! File round-trip suite.
//!
//! A suite directory is laid out as `<suite>/<algorithm>/<mode>/` with
//! one test per `*.key` file; the companion `.iv`, `.plain` and
//! `.cipher` files share the stem. The external `encrypt_file` /
//! `decrypt_file` tools write into a scratch temp file which is then
//! byte-compared against the expected companion.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use tempfile::NamedTempFile;

use crate::error::{HarnessError, Result};
use crate::model::{Algorithm, Direction, Mode, Outcome, RunSummary};
use crate::tools::FileTool;

const KEY_EXT: &str = "key";
const IV_EXT: &str = "iv";
const PLAIN_EXT: &str = "plain";
const CIPHER_EXT: &str = "cipher";

/// One discovered test: paths only, nothing read yet.
#[derive(Debug, Clone)]
pub struct FileTest {
    pub algorithm: Algorithm,
    pub mode: Mode,
    pub name: String,
    pub key_path: PathBuf,
    pub iv_path: Option<PathBuf>,
    pub plaintext_path: PathBuf,
    pub ciphertext_path: PathBuf,
}

fn list_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|source| HarnessError::Read {
        path: root.to_path_buf(),
        source,
    })?;
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| HarnessError::Read {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn list_key_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| HarnessError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut keys = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| HarnessError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == KEY_EXT) {
            keys.push(path);
        }
    }
    keys.sort();
    Ok(keys)
}

fn dir_token(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Walks the suite tree. Directories that do not name a supported
/// algorithm or mode are logged and skipped, like unrecognized vector
/// files.
pub fn enum_tests(suite_dir: &Path) -> Result<Vec<FileTest>> {
    info!("Suite directory path: {}", suite_dir.display());
    let mut tests = Vec::new();

    for algorithm_dir in list_dirs(suite_dir)? {
        let token = dir_token(&algorithm_dir);
        let Some(algorithm) = Algorithm::try_parse(&token) else {
            warn!("Unknown or unsupported algorithm: {}", token);
            continue;
        };
        for mode_dir in list_dirs(&algorithm_dir)? {
            let token = dir_token(&mode_dir);
            let Some(mode) = Mode::try_parse(&token) else {
                warn!("Unknown or unsupported mode: {}", token);
                continue;
            };
            for key_path in list_key_files(&mode_dir)? {
                let name = key_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let iv_path = mode
                    .requires_init_vector()
                    .then(|| key_path.with_extension(IV_EXT));
                tests.push(FileTest {
                    algorithm,
                    mode,
                    name,
                    plaintext_path: key_path.with_extension(PLAIN_EXT),
                    ciphertext_path: key_path.with_extension(CIPHER_EXT),
                    iv_path,
                    key_path,
                });
            }
        }
    }
    Ok(tests)
}

fn read_first_line(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|source| HarnessError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().next().unwrap_or("").trim().to_string())
}

fn files_match(expected: &Path, actual: &Path) -> Result<bool> {
    let expected_bytes = fs::read(expected).map_err(|source| HarnessError::Read {
        path: expected.to_path_buf(),
        source,
    })?;
    let actual_bytes = fs::read(actual).map_err(|source| HarnessError::Read {
        path: actual.to_path_buf(),
        source,
    })?;
    Ok(expected_bytes == actual_bytes)
}

fn run_encryption_test(tool: &dyn FileTool, test: &FileTest, key: &str, iv: Option<&str>, force: bool) -> Outcome {
    info!("Running encryption test '{}'...", test.name);
    info!("\tPlaintext file path: {}", test.plaintext_path.display());
    info!("\tExpected ciphertext file path: {}", test.ciphertext_path.display());

    let output = match NamedTempFile::new() {
        Ok(output) => output,
        Err(e) => {
            error!("Could not create the output file: {}", e);
            return Outcome::Error;
        }
    };

    if let Err(e) = tool.run_file(
        Direction::Encrypt,
        test.algorithm,
        test.mode,
        key,
        iv,
        &test.plaintext_path,
        output.path(),
    ) {
        error!("Encountered an exception!");
        error!("{}", e);
        return Outcome::Error;
    }

    if force {
        warn!("Overwriting expected ciphertext file");
        return match fs::copy(output.path(), &test.ciphertext_path) {
            Ok(_) => Outcome::Skipped,
            Err(e) => {
                error!("Could not overwrite '{}': {}", test.ciphertext_path.display(), e);
                Outcome::Error
            }
        };
    }

    match files_match(&test.ciphertext_path, output.path()) {
        Ok(true) => Outcome::Success,
        Ok(false) => {
            error!("The encrypted file doesn't match the expected ciphertext file");
            Outcome::Failure
        }
        Err(e) => {
            error!("{}", e);
            Outcome::Error
        }
    }
}

fn run_decryption_test(tool: &dyn FileTool, test: &FileTest, key: &str, iv: Option<&str>) -> Outcome {
    info!("Running decryption test '{}'...", test.name);
    info!("\tCiphertext file path: {}", test.ciphertext_path.display());
    info!("\tExpected plaintext file path: {}", test.plaintext_path.display());

    let output = match NamedTempFile::new() {
        Ok(output) => output,
        Err(e) => {
            error!("Could not create the output file: {}", e);
            return Outcome::Error;
        }
    };

    if let Err(e) = tool.run_file(
        Direction::Decrypt,
        test.algorithm,
        test.mode,
        key,
        iv,
        &test.ciphertext_path,
        output.path(),
    ) {
        error!("Encountered an exception!");
        error!("{}", e);
        return Outcome::Error;
    }

    match files_match(&test.plaintext_path, output.path()) {
        Ok(true) => Outcome::Success,
        Ok(false) => {
            error!("The decrypted file doesn't match the expected plaintext file");
            Outcome::Failure
        }
        Err(e) => {
            error!("{}", e);
            Outcome::Error
        }
    }
}

/// Runs every discovered test in both directions. With `force` the
/// expected ciphertext files are regenerated from the tool's output
/// instead of checked, and those tests count as skipped.
pub fn run(tool: &dyn FileTool, suite_dir: &Path, force: bool) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for test in enum_tests(suite_dir)? {
        let key = match read_first_line(&test.key_path) {
            Ok(key) => key,
            Err(e) => {
                error!("{}", e);
                summary.record(Outcome::Error);
                continue;
            }
        };
        let iv = match &test.iv_path {
            Some(iv_path) => match read_first_line(iv_path) {
                Ok(iv) => Some(iv),
                Err(e) => {
                    error!("{}", e);
                    summary.record(Outcome::Error);
                    continue;
                }
            },
            None => None,
        };

        summary.record(run_encryption_test(tool, &test, &key, iv.as_deref(), force));
        summary.record(run_decryption_test(tool, &test, &key, iv.as_deref()));
    }

    summary.log_totals();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, text: &str) {
        fs::write(path, text).unwrap();
    }

    #[test]
    fn enumerates_only_recognized_directories() {
        let suite = tempfile::tempdir().unwrap();
        let cbc = suite.path().join("aes128").join("cbc");
        fs::create_dir_all(&cbc).unwrap();
        write(&cbc.join("t1.key"), "2b7e151628aed2a6abf7158809cf4f3c\n");
        write(&cbc.join("t1.iv"), "000102030405060708090a0b0c0d0e0f\n");
        fs::create_dir_all(suite.path().join("des").join("cbc")).unwrap();
        fs::create_dir_all(suite.path().join("aes128").join("xts")).unwrap();

        let tests = enum_tests(suite.path()).unwrap();
        assert_eq!(tests.len(), 1);
        let test = &tests[0];
        assert_eq!(test.algorithm, Algorithm::Aes128);
        assert_eq!(test.mode, Mode::Cbc);
        assert_eq!(test.name, "t1");
        assert!(test.iv_path.is_some());
        assert_eq!(test.plaintext_path, cbc.join("t1.plain"));
        assert_eq!(test.ciphertext_path, cbc.join("t1.cipher"));
    }

    #[test]
    fn ecb_tests_have_no_iv_path() {
        let suite = tempfile::tempdir().unwrap();
        let ecb = suite.path().join("aes256").join("ecb");
        fs::create_dir_all(&ecb).unwrap();
        write(&ecb.join("t.key"), "00\n");

        let tests = enum_tests(suite.path()).unwrap();
        assert_eq!(tests.len(), 1);
        assert!(tests[0].iv_path.is_none());
    }

    #[test]
    fn first_line_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("k.key");
        write(&path, "aabbcc\nsecond line\n");
        assert_eq!(read_first_line(&path).unwrap(), "aabbcc");
    }
}
