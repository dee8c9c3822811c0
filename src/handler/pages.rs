//! Landing page handlers
//!
//! Fetch records from the page store and turn them into responses. The
//! error mapping here is the user-visible contract: a missing or invalid
//! slug is a 404, a store with no loaded snapshot is a 503.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::sync::Arc;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use crate::store::{LandingPage, StoreError};

/// Slug validation: lowercase alphanumeric plus `-` and `_`, at most 64
/// bytes. Invalid slugs are answered 404 like any other miss.
pub fn valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Serve a page by its captured slug
pub async fn serve_page(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
    slug: &str,
) -> Response<Full<Bytes>> {
    if !valid_slug(slug) {
        return http::build_404_response();
    }

    match state.store.get(slug).await {
        Ok(Some(page)) => http::build_html_response(render_page(&page), ctx.is_head),
        Ok(None) => http::build_404_response(),
        Err(e) => store_failure(&e),
    }
}

/// Serve the index page: the record with slug "index" when present,
/// otherwise a built-in welcome page listing nothing.
pub async fn serve_index(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match state.store.get("index").await {
        Ok(Some(page)) => http::build_html_response(render_page(&page), ctx.is_head),
        Ok(None) => http::build_html_response(render_welcome(), ctx.is_head),
        Err(e) => store_failure(&e),
    }
}

/// Serve the JSON listing of published pages
pub async fn serve_page_list(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    match state.store.list().await {
        Ok(pages) => http::build_json_response(
            StatusCode::OK,
            &serde_json::json!({ "pages": pages }),
            ctx.is_head,
        ),
        Err(e) => store_failure(&e),
    }
}

/// Map store errors onto responses. Only `Unavailable` reaches the request
/// path; anything else is a bug worth logging before degrading to 503.
fn store_failure(err: &StoreError) -> Response<Full<Bytes>> {
    if !matches!(err, StoreError::Unavailable) {
        logger::log_error(&format!("Unexpected store failure on request path: {err}"));
    }
    http::build_503_response()
}

/// Wrap a record in the fixed HTML shell. Titles are escaped; the body is
/// trusted HTML from the pages file.
pub fn render_page(page: &LandingPage) -> String {
    let title = escape_html(&page.title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="icon" href="/favicon.svg">
    <link rel="stylesheet" href="/assets/site.css">
</head>
<body>
    <main class="page">
        <h1>{title}</h1>
        {body}
    </main>
</body>
</html>"#,
        body = page.body,
    )
}

/// Built-in welcome page used when no "index" record exists
fn render_welcome() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>landingd</title>
</head>
<body>
    <main class="page">
        <h1>landingd</h1>
        <p>This server is up, but no index page has been published yet.</p>
        <p>See <a href="/pages">the page listing</a>.</p>
    </main>
</body>
</html>"#
        .to_string()
}

/// Escape text for safe interpolation into HTML
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
