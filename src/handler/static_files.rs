//! Static asset serving module
//!
//! Serves files from the configured asset directory with path-traversal
//! protection, MIME detection, and ETag/304 conditional GET.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;

/// Serve a file under the asset directory for a prefix-matched request
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    dir: &str,
    prefix: &str,
) -> Response<Full<Bytes>> {
    match load_asset(dir, ctx.path, prefix).await {
        Some((content, content_type)) => {
            build_asset_response(&content, content_type, ctx.if_none_match.as_deref(), ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Serve the favicon from the asset directory (request path basename)
pub async fn serve_favicon(
    ctx: &RequestContext<'_>,
    asset_dir: Option<&str>,
) -> Response<Full<Bytes>> {
    let Some(dir) = asset_dir else {
        return http::build_404_response();
    };
    match load_asset(dir, ctx.path, "/").await {
        Some((content, content_type)) => {
            build_asset_response(&content, content_type, ctx.if_none_match.as_deref(), ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load a file from the asset directory.
/// The request path has `prefix` stripped; the resolved file must stay
/// inside the asset directory after canonicalization.
async fn load_asset(dir: &str, path: &str, prefix: &str) -> Option<(Vec<u8>, &'static str)> {
    let relative = path.strip_prefix(prefix).unwrap_or(path);
    let relative = relative.trim_start_matches('/').replace("..", "");
    if relative.is_empty() {
        return None;
    }

    let dir_canonical = match Path::new(dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset directory not found or inaccessible '{dir}': {e}"
            ));
            return None;
        }
    };

    let file_path = Path::new(dir).join(&relative);

    // Missing files are ordinary 404s, not worth a warning
    let Ok(file_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_canonical.starts_with(&dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read asset '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build asset response with cache validators
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(Bytes::from(data.to_owned()), content_type, &etag, is_head)
}
