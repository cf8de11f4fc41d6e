//! HTTP protocol layer module
//!
//! Response builders and the CORS header set, decoupled from request handling.

pub mod cors;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_405_response, build_json_error_response, build_preflight_response,
    build_spreadsheet_response, build_text_response,
};
