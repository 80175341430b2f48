//! Invocation of the external block-cipher executables.
//!
//! The verification engines only consume the [`BlockTool`] and
//! [`FileTool`] capabilities; [`Tools`] is the process-backed
//! implementation that shells out to `encrypt_block`, `decrypt_block`,
//! `encrypt_file` and `decrypt_file`.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{error, info, warn};

use crate::error::{HarnessError, Result};
use crate::model::{Algorithm, BlockInput, Direction, Mode};

const ENCRYPT_BLOCK: &str = "encrypt_block";
const DECRYPT_BLOCK: &str = "decrypt_block";
const ENCRYPT_FILE: &str = "encrypt_file";
const DECRYPT_FILE: &str = "decrypt_file";

/// Capability consumed by the batch verification engines: one call runs
/// the external tool over a whole batch and yields its hex outputs in
/// the order of the inputs.
pub trait BlockTool {
    fn run_block(
        &self,
        direction: Direction,
        algorithm: Algorithm,
        mode: Mode,
        batch: &[BlockInput],
    ) -> Result<Vec<String>>;
}

/// Capability consumed by the file round-trip suite.
pub trait FileTool {
    #[allow(clippy::too_many_arguments)]
    fn run_file(
        &self,
        direction: Direction,
        algorithm: Algorithm,
        mode: Mode,
        key: &str,
        iv: Option<&str>,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<()>;
}

/// Process-backed tool set.
///
/// Extra search directories are appended to the spawned process's
/// `PATH`, so the executables are resolved the same way a shell would
/// resolve them. With `use_sde` the whole command line is wrapped in
/// `sde --` for instrumented runs.
pub struct Tools {
    search_dirs: Vec<PathBuf>,
    use_sde: bool,
    use_boxes: bool,
}

impl Tools {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs,
            use_sde: false,
            use_boxes: false,
        }
    }

    pub fn with_sde(mut self, use_sde: bool) -> Self {
        self.use_sde = use_sde;
        self
    }

    /// Selects the alternate "boxes" interface of the block tools.
    pub fn with_boxes(mut self, use_boxes: bool) -> Self {
        self.use_boxes = use_boxes;
        self
    }

    fn run(&self, tool: &str, args: &[String]) -> Result<Vec<String>> {
        let mut command = if self.use_sde {
            let mut c = Command::new("sde");
            c.arg("--").arg(tool);
            c
        } else {
            Command::new(tool)
        };
        command.args(args);

        if !self.search_dirs.is_empty() {
            let mut paths: Vec<PathBuf> = env::var_os("PATH")
                .map(|p| env::split_paths(&p).collect())
                .unwrap_or_default();
            paths.extend(self.search_dirs.iter().cloned());
            match env::join_paths(paths) {
                Ok(joined) => {
                    command.env("PATH", joined);
                }
                Err(e) => warn!("Could not extend PATH: {}", e),
            }
        }

        info!("Trying to execute: {} {}", tool, args.join(" "));

        let output = command.output().map_err(|source| HarnessError::ToolLaunch {
            command: tool.to_string(),
            source,
        })?;

        if !output.status.success() {
            error!("Output:\n{}", String::from_utf8_lossy(&output.stderr));
            return Err(HarnessError::ToolExit {
                command: tool.to_string(),
                status: output.status,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| HarnessError::ToolOutput {
            command: tool.to_string(),
        })?;
        info!("Output:\n{}", stdout);
        Ok(stdout.split_whitespace().map(str::to_string).collect())
    }

    fn block_args(&self, algorithm: Algorithm, mode: Mode, batch: &[BlockInput]) -> Vec<String> {
        let mut args = vec![
            "--algorithm".to_string(),
            algorithm.to_string(),
            "--mode".to_string(),
            mode.to_string(),
        ];
        if self.use_boxes {
            args.push("--use-boxes".to_string());
        }
        for input in batch {
            args.push("--".to_string());
            args.extend(input.to_args());
        }
        args
    }
}

impl BlockTool for Tools {
    fn run_block(
        &self,
        direction: Direction,
        algorithm: Algorithm,
        mode: Mode,
        batch: &[BlockInput],
    ) -> Result<Vec<String>> {
        let tool = match direction {
            Direction::Encrypt => ENCRYPT_BLOCK,
            Direction::Decrypt => DECRYPT_BLOCK,
        };
        self.run(tool, &self.block_args(algorithm, mode, batch))
    }
}

impl FileTool for Tools {
    fn run_file(
        &self,
        direction: Direction,
        algorithm: Algorithm,
        mode: Mode,
        key: &str,
        iv: Option<&str>,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        let tool = match direction {
            Direction::Encrypt => ENCRYPT_FILE,
            Direction::Decrypt => DECRYPT_FILE,
        };
        let mut args = vec![
            "--algorithm".to_string(),
            algorithm.to_string(),
            "--mode".to_string(),
            mode.to_string(),
            "--key".to_string(),
            key.to_string(),
            "--input-path".to_string(),
            input_path.display().to_string(),
            "--output-path".to_string(),
            output_path.display().to_string(),
        ];
        if let Some(iv) = iv {
            args.push("--iv".to_string());
            args.push(iv.to_string());
        }
        self.run(tool, &args).map(|_| ())
    }
}
