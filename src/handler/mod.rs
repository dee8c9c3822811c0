//! Request handler module
//!
//! Dispatch from the route table into the page, health, and static asset
//! handlers.

pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
