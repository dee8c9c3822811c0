//! Landing-page store module
//!
//! Data accessor for `LandingPage` records. Pages live in a TOML file on
//! disk and are read into an in-memory snapshot; lookups never touch the
//! filesystem on the request path.

mod file;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FilePageStore;

/// A content record served to unauthenticated visitors
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LandingPage {
    /// Identifier used in URLs (`/pages/{slug}`)
    pub slug: String,
    pub title: String,
    /// Short description shown in listings
    #[serde(default)]
    pub summary: Option<String>,
    /// HTML fragment placed into the page shell
    pub body: String,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_published() -> bool {
    true
}

/// Listing entry - everything but the body
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageSummary {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&LandingPage> for PageSummary {
    fn from(page: &LandingPage) -> Self {
        Self {
            slug: page.slug.clone(),
            title: page.title.clone(),
            summary: page.summary.clone(),
            updated_at: page.updated_at,
        }
    }
}

/// Store failures visible to handlers
///
/// `Unavailable` is the only variant surfaced on the request path: it means
/// no snapshot has ever loaded and maps to a 503. Load failures carry the
/// file path so the operator log is actionable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page store has no loaded snapshot")]
    Unavailable,
    #[error("failed to read pages file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse pages file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
