//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by all handlers: response builders,
//! cache validators, and MIME detection.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_503_response, build_cached_response, build_direct_response, build_health_response,
    build_html_response, build_json_response, build_options_response, build_redirect_response,
};
