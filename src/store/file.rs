//! File-backed page store
//!
//! Reads landing-page records from a TOML file into an immutable snapshot.
//! `reload` swaps the snapshot atomically and keeps the last good one when
//! the new file is unreadable or malformed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use serde::Deserialize;

use super::{LandingPage, PageSummary, StoreError};
use crate::logger;

/// On-disk layout: a list of `[[pages]]` tables
#[derive(Debug, Deserialize)]
struct PagesFile {
    #[serde(default)]
    pages: Vec<LandingPage>,
}

/// Immutable set of published pages, keyed by slug
#[derive(Debug, Default)]
struct PageSet {
    by_slug: HashMap<String, Arc<LandingPage>>,
    /// Slugs in file order, for stable listings
    order: Vec<String>,
}

impl PageSet {
    /// Build a page set from TOML text, dropping unpublished records.
    /// On duplicate slugs the first record wins.
    fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let parsed: PagesFile = toml::from_str(content)?;
        let mut set = Self::default();
        for page in parsed.pages {
            if !page.published {
                continue;
            }
            if set.by_slug.contains_key(&page.slug) {
                logger::log_warning(&format!(
                    "Duplicate page slug '{}', keeping first record",
                    page.slug
                ));
                continue;
            }
            set.order.push(page.slug.clone());
            set.by_slug.insert(page.slug.clone(), Arc::new(page));
        }
        Ok(set)
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// File-backed landing-page accessor
///
/// The snapshot starts empty (`None`); until the first successful `load`
/// every lookup reports `StoreError::Unavailable`.
pub struct FilePageStore {
    path: PathBuf,
    snapshot: RwLock<Option<Arc<PageSet>>>,
}

impl FilePageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: RwLock::new(None),
        }
    }

    #[allow(clippy::missing_const_for_fn)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the pages file, installing a new snapshot on success.
    /// Returns the number of published pages loaded.
    pub async fn load(&self) -> Result<usize, StoreError> {
        let display_path = self.path.display().to_string();
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: display_path.clone(),
                source,
            })?;

        let set = PageSet::from_toml(&content).map_err(|source| StoreError::Parse {
            path: display_path,
            source,
        })?;

        let count = set.len();
        let mut snapshot = self.snapshot.write().await;
        *snapshot = Some(Arc::new(set));
        Ok(count)
    }

    /// Reload from disk, keeping the previous snapshot on failure.
    /// Failures are logged; the caller sees them too for signal reporting.
    pub async fn reload(&self) -> Result<usize, StoreError> {
        match self.load().await {
            Ok(count) => {
                logger::log_store_reloaded(count);
                Ok(count)
            }
            Err(e) => {
                logger::log_error(&format!("Page reload failed, keeping old snapshot: {e}"));
                Err(e)
            }
        }
    }

    /// Fetch a published page by slug.
    /// `Ok(None)` means not found; `Err(Unavailable)` means storage is down.
    pub async fn get(&self, slug: &str) -> Result<Option<Arc<LandingPage>>, StoreError> {
        let snapshot = self.snapshot.read().await;
        let set = snapshot.as_ref().ok_or(StoreError::Unavailable)?;
        Ok(set.by_slug.get(slug).cloned())
    }

    /// List published pages in file order
    pub async fn list(&self) -> Result<Vec<PageSummary>, StoreError> {
        let snapshot = self.snapshot.read().await;
        let set = snapshot.as_ref().ok_or(StoreError::Unavailable)?;
        Ok(set
            .order
            .iter()
            .filter_map(|slug| set.by_slug.get(slug))
            .map(|page| PageSummary::from(page.as_ref()))
            .collect())
    }

    /// Whether a snapshot has ever loaded (readiness probe)
    pub async fn is_loaded(&self) -> bool {
        self.snapshot.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[pages]]
slug = "welcome"
title = "Welcome"
summary = "Front door"
body = "<p>Hello</p>"

[[pages]]
slug = "pricing"
title = "Pricing"
body = "<p>Free</p>"
updated_at = "2024-06-01T12:00:00Z"

[[pages]]
slug = "draft"
title = "Not yet"
body = "<p>WIP</p>"
published = false
"#;

    #[test]
    fn test_parse_filters_unpublished() {
        let set = PageSet::from_toml(SAMPLE).expect("sample parses");
        assert_eq!(set.len(), 2);
        assert!(set.by_slug.contains_key("welcome"));
        assert!(set.by_slug.contains_key("pricing"));
        assert!(!set.by_slug.contains_key("draft"));
    }

    #[test]
    fn test_parse_keeps_file_order() {
        let set = PageSet::from_toml(SAMPLE).expect("sample parses");
        assert_eq!(set.order, vec!["welcome", "pricing"]);
    }

    #[test]
    fn test_parse_duplicate_slug_first_wins() {
        let dup = r#"
[[pages]]
slug = "a"
title = "First"
body = "1"

[[pages]]
slug = "a"
title = "Second"
body = "2"
"#;
        let set = PageSet::from_toml(dup).expect("parses");
        assert_eq!(set.len(), 1);
        assert_eq!(set.by_slug["a"].title, "First");
    }

    #[test]
    fn test_parse_empty_file() {
        let set = PageSet::from_toml("").expect("empty file is an empty set");
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(PageSet::from_toml("[[pages]]\nslug = 1").is_err());
    }

    fn temp_pages_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("landingd-{}-{name}", std::process::id()));
        std::fs::write(&path, content).expect("temp file write");
        path
    }

    #[tokio::test]
    async fn test_unloaded_store_is_unavailable() {
        let store = FilePageStore::new("/nonexistent/pages.toml");
        assert!(!store.is_loaded().await);
        assert!(matches!(
            store.get("welcome").await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(store.list().await, Err(StoreError::Unavailable)));
    }

    #[tokio::test]
    async fn test_load_get_and_list() {
        let path = temp_pages_file("load.toml", SAMPLE);
        let store = FilePageStore::new(&path);
        let count = store.load().await.expect("load succeeds");
        assert_eq!(count, 2);
        assert!(store.is_loaded().await);

        let page = store.get("pricing").await.expect("store up");
        assert_eq!(page.expect("found").title, "Pricing");

        let missing = store.get("nope").await.expect("store up");
        assert!(missing.is_none());

        let draft = store.get("draft").await.expect("store up");
        assert!(draft.is_none(), "unpublished pages are invisible");

        let listing = store.list().await.expect("store up");
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].slug, "welcome");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_reload_keeps_last_good_snapshot() {
        let path = temp_pages_file("reload.toml", SAMPLE);
        let store = FilePageStore::new(&path);
        store.load().await.expect("initial load");

        std::fs::write(&path, "not valid toml [").expect("temp file write");
        assert!(store.reload().await.is_err());

        // Old snapshot still serves
        let page = store.get("welcome").await.expect("store up");
        assert!(page.is_some());

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let store = FilePageStore::new("/nonexistent/landingd-pages.toml");
        assert!(matches!(store.load().await, Err(StoreError::Io { .. })));
    }
}
