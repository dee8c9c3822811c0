// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, ContentConfig, ExtraAction, ExtraRoute, HttpConfig, LoggingConfig, PerformanceConfig,
    ServerConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("LANDINGD"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "landingd/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB, public routes are read-only
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist").expect("defaults should load");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.content.pages_file, "pages.toml");
        assert_eq!(cfg.content.asset_prefix, "/assets/");
        assert!(cfg.content.extra_routes.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("does-not-exist").expect("defaults should load");
        let addr = cfg.get_socket_addr().expect("valid address");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_extra_routes_from_file() {
        // Flattened tagged enum through the config-crate deserializer
        let path = std::env::temp_dir().join(format!("landingd-config-{}", std::process::id()));
        let file = path.with_extension("toml");
        std::fs::write(
            &file,
            r#"
[[content.extra_routes]]
path = "/old-home"
type = "redirect"
target = "/"
code = 301

[[content.extra_routes]]
path = "/robots.txt"
type = "direct"
status = 200
body = "User-agent: *\nAllow: /"
content_type = "text/plain"
"#,
        )
        .expect("temp config write");

        let cfg = Config::load_from(path.to_str().expect("utf8 path")).expect("config loads");
        assert_eq!(cfg.content.extra_routes.len(), 2);
        assert_eq!(
            cfg.content.extra_routes[0],
            ExtraRoute {
                path: "/old-home".to_string(),
                action: ExtraAction::Redirect {
                    target: "/".to_string(),
                    code: 301,
                },
            }
        );
        match &cfg.content.extra_routes[1].action {
            ExtraAction::Direct {
                status,
                body,
                content_type,
            } => {
                assert_eq!(*status, 200);
                assert_eq!(body.as_deref(), Some("User-agent: *\nAllow: /"));
                assert_eq!(content_type.as_deref(), Some("text/plain"));
            }
            other => panic!("expected direct action, got {other:?}"),
        }

        let _ = std::fs::remove_file(file);
    }
}
