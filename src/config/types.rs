// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Content configuration - page store location and public route extras
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ContentConfig {
    /// TOML file holding the landing-page records
    #[serde(default = "default_pages_file")]
    pub pages_file: String,
    /// Directory served for static assets (css, images), if any
    #[serde(default)]
    pub asset_dir: Option<String>,
    /// URL prefix under which the asset directory is mounted
    #[serde(default = "default_asset_prefix")]
    pub asset_prefix: String,
    /// Paths answered with the favicon file from the asset directory
    #[serde(default = "default_favicon_paths")]
    pub favicon_paths: Vec<String>,
    /// Extra route bindings appended after the built-in ones
    #[serde(default)]
    pub extra_routes: Vec<ExtraRoute>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_pages_file() -> String {
    "pages.toml".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_asset_prefix() -> String {
    "/assets/".to_string()
}

fn default_favicon_paths() -> Vec<String> {
    vec!["/favicon.ico".to_string(), "/favicon.svg".to_string()]
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            pages_file: default_pages_file(),
            asset_dir: None,
            asset_prefix: default_asset_prefix(),
            favicon_paths: default_favicon_paths(),
            extra_routes: Vec::new(),
        }
    }
}

/// Config-supplied route binding (path plus action)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ExtraRoute {
    /// Path pattern: exact ("/about"), trailing slash for prefix ("/old/")
    pub path: String,
    #[serde(flatten)]
    pub action: ExtraAction,
}

/// Action taken when an extra route matches
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtraAction {
    /// HTTP redirect
    Redirect {
        target: String,
        #[serde(default = "default_redirect_code")]
        code: u16,
    },
    /// Direct response with a fixed status and body
    Direct {
        status: u16,
        #[serde(default)]
        body: Option<String>,
        #[serde(default)]
        content_type: Option<String>,
    },
}

#[allow(clippy::missing_const_for_fn)]
fn default_redirect_code() -> u16 {
    302
}
