//! landingd library crate
//!
//! Serves landing-page content to unauthenticated visitors over HTTP/1.1.
//! The binary in `main.rs` wires these modules together; they are exposed
//! as a library so doc examples and tests can reach them.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod store;
