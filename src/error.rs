//! Structured error types for the harness.
//!
//! A filename that fails classification is deliberately *not* an error
//! (the file is skipped); everything here maps to an ERROR outcome at
//! the run-aggregation boundary.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("line {line}: expected `field = value`, got `{text}`")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: field appears before any section header")]
    FieldOutsideSection { line: usize },

    #[error("missing section [{0}]")]
    MissingSection(String),

    #[error("missing required field `{field}` in section [{section}]")]
    MissingField {
        section: String,
        field: &'static str,
    },

    #[error("field `{field}` in section [{section}] is not valid hex: {source}")]
    BadHex {
        section: String,
        field: &'static str,
        source: hex::FromHexError,
    },

    #[error("section [{section}]: field `{field}` has {actual} values, expected {expected}")]
    LengthMismatch {
        section: String,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("failed to launch `{command}`: {source}")]
    ToolLaunch {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    ToolExit { command: String, status: ExitStatus },

    #[error("`{command}` produced non-UTF-8 output")]
    ToolOutput { command: String },

    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HarnessError>;
