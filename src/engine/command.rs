//! Command-line placement engine
//!
//! Runs the placement program as a child process:
//!
//! ```text
//! <program> [args...] <tiles-file> <reqs-file> --grids N --rows N --seed N
//! ```
//!
//! The uploads are written to temporary files, the spreadsheet is read from
//! stdout, and a non-zero exit turns stderr into the error message.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;

use super::{EngineError, PlacementEngine, PlacementParams};
use crate::config::EngineConfig;

pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandEngine {
    /// Resolve the configured program; fails if it cannot be found
    pub fn load(config: &EngineConfig) -> Result<Self, EngineError> {
        let program = resolve_program(&config.program).ok_or_else(|| {
            EngineError::Load(format!("program '{}' not found", config.program))
        })?;
        Ok(Self {
            program,
            args: config.args.clone(),
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl PlacementEngine for CommandEngine {
    fn place_and_export(
        &self,
        tiles: &[u8],
        reqs: &[u8],
        params: &PlacementParams,
    ) -> Result<Vec<u8>, EngineError> {
        let tiles_file = write_temp(tiles)?;
        let reqs_file = write_temp(reqs)?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(tiles_file.path())
            .arg(reqs_file.path())
            .arg("--grids")
            .arg(params.grids.to_string())
            .arg("--rows")
            .arg(params.rows.to_string())
            .arg("--seed")
            .arg(params.seed.to_string())
            .output()?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr.trim();
        if message.is_empty() {
            Err(EngineError::failed(format!(
                "placement engine exited with {}",
                output.status
            )))
        } else {
            Err(EngineError::failed(message))
        }
    }
}

fn write_temp(data: &[u8]) -> Result<NamedTempFile, EngineError> {
    let mut file = NamedTempFile::new()?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file)
}

/// Locate an executable: paths are taken as-is, bare names are searched on `PATH`
fn resolve_program(program: &str) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|p| p.is_file())
    })
}
