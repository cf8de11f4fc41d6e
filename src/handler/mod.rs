//! Request handler module
//!
//! Routing, multipart extraction, parameter resolution and the processing
//! pipeline that hands uploads to the placement engine.

pub mod form;
pub mod params;
pub mod process;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
