//! Request dispatch module
//!
//! Entry point for HTTP request processing: method handling, body-size
//! enforcement, route table lookup, and access logging.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::handler::{pages, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{RouteLookup, RouteTarget};

/// Request context handed to the individual handlers
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let if_none_match = header_value(&req, "if-none-match");
    let referer = header_value(&req, "referer");
    let user_agent = header_value(&req, "user-agent");

    let path = uri.path();
    let is_head = method == Method::HEAD;

    let mut response = if method == Method::OPTIONS {
        http::build_options_response(state.config.http.enable_cors)
    } else if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp
    } else {
        let ctx = RequestContext {
            path,
            is_head,
            if_none_match,
        };
        dispatch(&ctx, &method, &state).await
    };

    decorate_response(&mut response, &state);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer.ip().to_string(),
            method.to_string(),
            path.to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Consult the route table and run the matched handler
async fn dispatch(
    ctx: &RequestContext<'_>,
    method: &Method,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    match state.routes.lookup(method, ctx.path) {
        RouteLookup::Matched { target, param } => match target {
            RouteTarget::Index => pages::serve_index(ctx, state).await,
            RouteTarget::Page => pages::serve_page(ctx, state, param.unwrap_or("")).await,
            RouteTarget::PageList => pages::serve_page_list(ctx, state).await,
            RouteTarget::HealthLive => http::build_health_response(true),
            RouteTarget::HealthReady => http::build_health_response(state.store.is_loaded().await),
            RouteTarget::Favicon => {
                static_files::serve_favicon(ctx, state.config.content.asset_dir.as_deref()).await
            }
            RouteTarget::AssetDir { dir, prefix } => {
                static_files::serve_asset(ctx, dir, prefix).await
            }
            RouteTarget::Redirect { target, code } => http::build_redirect_response(target, *code),
            RouteTarget::Direct {
                status,
                body,
                content_type,
            } => http::build_direct_response(
                *status,
                body.as_deref(),
                content_type.as_deref(),
                ctx.is_head,
            ),
        },
        RouteLookup::MethodNotAllowed { allow } => {
            logger::log_warning(&format!("Method not allowed: {method} {}", ctx.path));
            http::build_405_response(&allow)
        }
        RouteLookup::NotFound => http::build_404_response(),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Stamp the configured Server header (and CORS origin) on every response
fn decorate_response(response: &mut Response<Full<Bytes>>, state: &AppState) {
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(hyper::header::SERVER, value);
    }
    if state.config.http.enable_cors {
        response.headers_mut().insert(
            hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}

/// Fetch a request header as an owned string, skipping non-UTF8 values
fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Response body size as reported by Content-Length
fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;

    fn test_state() -> Arc<AppState> {
        let config = Config::load_from("does-not-exist").expect("defaults load");
        Arc::new(AppState::new(&config))
    }

    async fn loaded_state(name: &str) -> Arc<AppState> {
        let path =
            std::env::temp_dir().join(format!("landingd-router-{}-{name}", std::process::id()));
        std::fs::write(
            &path,
            r#"
[[pages]]
slug = "welcome"
title = "Welcome"
summary = "Front door"
body = "<p>Hello</p>"
"#,
        )
        .expect("temp pages write");

        let mut config = Config::load_from("does-not-exist").expect("defaults load");
        config.content.pages_file = path.to_str().expect("utf8 path").to_string();
        let state = Arc::new(AppState::new(&config));
        state.store.load().await.expect("pages load");
        state
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.expect("body").to_bytes()
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_health_probes() {
        let state = test_state();
        let resp = dispatch(&ctx("/healthz"), &Method::GET, &state).await;
        assert_eq!(resp.status(), 200);

        // Store never loaded: not ready
        let resp = dispatch(&ctx("/readyz"), &Method::GET, &state).await;
        assert_eq!(resp.status(), 503);
    }

    #[tokio::test]
    async fn test_dispatch_page_unavailable_store() {
        let state = test_state();
        let resp = dispatch(&ctx("/pages/welcome"), &Method::GET, &state).await;
        assert_eq!(resp.status(), 503);
        assert_eq!(resp.headers()["Retry-After"], "5");
    }

    #[tokio::test]
    async fn test_dispatch_serves_loaded_page() {
        let state = loaded_state("page.toml").await;

        let resp = dispatch(&ctx("/pages/welcome"), &Method::GET, &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        let html = String::from_utf8(body_bytes(resp).await.to_vec()).expect("utf8 body");
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(html.contains("<p>Hello</p>"));

        let _ = std::fs::remove_file(&state.config.content.pages_file);
    }

    #[tokio::test]
    async fn test_dispatch_page_listing_shape() {
        let state = loaded_state("list.toml").await;

        let resp = dispatch(&ctx("/pages"), &Method::GET, &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        let value: serde_json::Value =
            serde_json::from_slice(&body_bytes(resp).await).expect("valid json");
        assert_eq!(value["pages"][0]["slug"], "welcome");
        assert_eq!(value["pages"][0]["title"], "Welcome");
        assert_eq!(value["pages"][0]["summary"], "Front door");
        // Listings carry summaries, never the body
        assert!(value["pages"][0].get("body").is_none());

        let _ = std::fs::remove_file(&state.config.content.pages_file);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_path() {
        let state = test_state();
        let resp = dispatch(&ctx("/nope"), &Method::GET, &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_dispatch_wrong_method() {
        let state = test_state();
        let resp = dispatch(&ctx("/pages"), &Method::POST, &state).await;
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_decorate_response() {
        let state = test_state();
        let mut resp = http::build_404_response();
        decorate_response(&mut resp, &state);
        assert_eq!(resp.headers()["Server"], "landingd/0.1");
        assert!(resp.headers().get("Access-Control-Allow-Origin").is_none());
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_2), "2");
    }
}
