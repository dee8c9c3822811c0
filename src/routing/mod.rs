//! Routing module
//!
//! The router registry: compiled path patterns and the ordered route table
//! that maps (HTTP method, path pattern) pairs to handler targets.

mod pattern;
mod table;

pub use pattern::PathPattern;
pub use table::{RouteBinding, RouteLookup, RouteTable, RouteTarget};
