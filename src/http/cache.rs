//! HTTP cache control module
//!
//! `ETag` generation and `If-None-Match` evaluation for conditional GET.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a quoted `ETag` for a body, e.g. `"9f86d08188"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Whether the client's `If-None-Match` header matches our `ETag`.
/// Handles comma-separated lists and the `*` wildcard; a match means 304.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}
