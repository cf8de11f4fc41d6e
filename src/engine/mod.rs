//! Placement engine module
//!
//! The placement/export engine is an external collaborator: it takes the two
//! uploaded documents plus the layout parameters and produces a spreadsheet.
//! This module defines that contract, the lazy process-wide handle, and the
//! command-line engine used by the server binary.

pub mod command;
pub mod loader;

pub use command::CommandEngine;
pub use loader::EngineLoader;

use thiserror::Error;

/// Default number of grids to fill
pub const DEFAULT_GRIDS: i64 = 10;
/// Default number of rows per grid
pub const DEFAULT_ROWS: i64 = 24;
/// Default random seed
pub const DEFAULT_SEED: i64 = 42;

/// Layout parameters handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementParams {
    pub grids: i64,
    pub rows: i64,
    pub seed: i64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            grids: DEFAULT_GRIDS,
            rows: DEFAULT_ROWS,
            seed: DEFAULT_SEED,
        }
    }
}

/// Engine failures
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine could not be initialized
    #[error("engine unavailable: {0}")]
    Load(String),

    /// Placement or export failed; the message comes from the engine verbatim
    #[error("{0}")]
    Failed(String),

    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Placement/export capability
///
/// Implementations are expected to be CPU-bound and are always invoked from
/// the blocking thread pool.
pub trait PlacementEngine: Send + Sync {
    /// Place tiles onto grids and return the resulting `.xlsx` document
    fn place_and_export(
        &self,
        tiles: &[u8],
        reqs: &[u8],
        params: &PlacementParams,
    ) -> Result<Vec<u8>, EngineError>;
}
