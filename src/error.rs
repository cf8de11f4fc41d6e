//! Request processing errors
//!
//! Every failure on the processing path is one of these kinds. They all
//! surface to the client as 400 responses; `MissingFiles` keeps its own
//! plain-text shape, the rest are rendered as `{"error": "<message>"}`.

use thiserror::Error;

use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum ProcessError {
    /// One or both uploads absent from the form
    #[error("Missing files 'tiles' and/or 'reqs'")]
    MissingFiles,

    /// A numeric form field that does not parse as an integer
    #[error("invalid value for '{field}': '{value}' ({source})")]
    InvalidParam {
        field: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },

    /// Malformed multipart body or missing boundary
    #[error("invalid form data: {0}")]
    Multipart(#[from] multer::Error),

    /// The request body could not be read (including size limit violations)
    #[error("failed to read request body: {0}")]
    Body(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type alias for request processing
pub type Result<T> = std::result::Result<T, ProcessError>;
