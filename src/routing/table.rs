//! Route table module
//!
//! The router registry: an ordered collection of (method, path pattern)
//! bindings. Lookup walks the bindings in registration order and returns the
//! first whose pattern matches; a path that matches only under a different
//! method is reported as such so the handler can answer 405 instead of 404.

use hyper::Method;

use super::pattern::PathPattern;
use crate::config::{ContentConfig, ExtraAction};

/// What a matched binding dispatches to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Landing index page ("/")
    Index,
    /// Single page looked up by the captured slug
    Page,
    /// JSON listing of published pages
    PageList,
    /// Liveness probe
    HealthLive,
    /// Readiness probe (store must have loaded)
    HealthReady,
    Favicon,
    /// Static files under a directory, mounted at a URL prefix
    AssetDir { dir: String, prefix: String },
    Redirect { target: String, code: u16 },
    Direct {
        status: u16,
        body: Option<String>,
        content_type: Option<String>,
    },
}

/// A single method + pattern + target binding
#[derive(Debug, Clone)]
pub struct RouteBinding {
    pub method: Method,
    pub pattern: PathPattern,
    pub target: RouteTarget,
}

/// Lookup outcome
#[derive(Debug, PartialEq, Eq)]
pub enum RouteLookup<'t, 'p> {
    /// A binding matched; `param` carries the captured segment, if any
    Matched {
        target: &'t RouteTarget,
        param: Option<&'p str>,
    },
    /// The path exists under other methods
    MethodNotAllowed { allow: String },
    NotFound,
}

/// Ordered route registry
#[derive(Debug, Default)]
pub struct RouteTable {
    bindings: Vec<RouteBinding>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding; earlier bindings win on overlap.
    pub fn bind(&mut self, method: Method, pattern: &str, target: RouteTarget) {
        self.bindings.push(RouteBinding {
            method,
            pattern: PathPattern::parse(pattern),
            target,
        });
    }

    /// Build the public route table: built-in landing routes first, then
    /// config-supplied extras.
    pub fn build(content: &ContentConfig) -> Self {
        let mut table = Self::new();

        table.bind(Method::GET, "/", RouteTarget::Index);
        table.bind(Method::GET, "/pages", RouteTarget::PageList);
        table.bind(Method::GET, "/pages/:slug", RouteTarget::Page);
        table.bind(Method::GET, "/healthz", RouteTarget::HealthLive);
        table.bind(Method::GET, "/readyz", RouteTarget::HealthReady);

        for path in &content.favicon_paths {
            table.bind(Method::GET, path, RouteTarget::Favicon);
        }

        if let Some(dir) = &content.asset_dir {
            let prefix = normalize_prefix(&content.asset_prefix);
            let pattern = prefix.clone();
            table.bind(
                Method::GET,
                &pattern,
                RouteTarget::AssetDir {
                    dir: dir.clone(),
                    prefix,
                },
            );
        }

        for route in &content.extra_routes {
            let target = match &route.action {
                ExtraAction::Redirect { target, code } => RouteTarget::Redirect {
                    target: target.clone(),
                    code: *code,
                },
                ExtraAction::Direct {
                    status,
                    body,
                    content_type,
                } => RouteTarget::Direct {
                    status: *status,
                    body: body.clone(),
                    content_type: content_type.clone(),
                },
            };
            table.bind(Method::GET, &route.path, target);
        }

        table
    }

    /// Find the first binding matching `method` and `path`.
    /// HEAD requests are served by GET bindings.
    pub fn lookup<'t, 'p>(&'t self, method: &Method, path: &'p str) -> RouteLookup<'t, 'p> {
        let effective = if *method == Method::HEAD {
            &Method::GET
        } else {
            method
        };

        let mut allowed: Vec<&str> = Vec::new();
        for binding in &self.bindings {
            let Some(param) = binding.pattern.matches(path) else {
                continue;
            };
            if binding.method == *effective {
                return RouteLookup::Matched {
                    target: &binding.target,
                    param,
                };
            }
            if !allowed.contains(&binding.method.as_str()) {
                allowed.push(binding.method.as_str());
            }
        }

        if allowed.is_empty() {
            RouteLookup::NotFound
        } else {
            let mut allow = String::new();
            for m in &allowed {
                if !allow.is_empty() {
                    allow.push_str(", ");
                }
                allow.push_str(m);
                if *m == "GET" {
                    allow.push_str(", HEAD");
                }
            }
            allow.push_str(", OPTIONS");
            RouteLookup::MethodNotAllowed { allow }
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Asset prefixes must end with '/' so "/assetsfoo" cannot leak through
fn normalize_prefix(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtraRoute;

    fn default_table() -> RouteTable {
        RouteTable::build(&ContentConfig::default())
    }

    #[test]
    fn test_builtin_bindings() {
        let table = default_table();
        assert!(matches!(
            table.lookup(&Method::GET, "/"),
            RouteLookup::Matched {
                target: RouteTarget::Index,
                param: None
            }
        ));
        assert!(matches!(
            table.lookup(&Method::GET, "/pages"),
            RouteLookup::Matched {
                target: RouteTarget::PageList,
                ..
            }
        ));
        assert!(matches!(
            table.lookup(&Method::GET, "/healthz"),
            RouteLookup::Matched {
                target: RouteTarget::HealthLive,
                ..
            }
        ));
    }

    #[test]
    fn test_page_param_capture() {
        let table = default_table();
        match table.lookup(&Method::GET, "/pages/welcome") {
            RouteLookup::Matched {
                target: RouteTarget::Page,
                param,
            } => assert_eq!(param, Some("welcome")),
            other => panic!("expected Page match, got {other:?}"),
        }
    }

    #[test]
    fn test_head_served_by_get_bindings() {
        let table = default_table();
        assert!(matches!(
            table.lookup(&Method::HEAD, "/pages/welcome"),
            RouteLookup::Matched {
                target: RouteTarget::Page,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_path_not_found() {
        let table = default_table();
        assert_eq!(
            table.lookup(&Method::GET, "/admin"),
            RouteLookup::NotFound
        );
        // POST to an unknown path stays a 404, not a 405
        assert_eq!(
            table.lookup(&Method::POST, "/admin"),
            RouteLookup::NotFound
        );
    }

    #[test]
    fn test_wrong_method_reports_allow() {
        let table = default_table();
        match table.lookup(&Method::POST, "/pages") {
            RouteLookup::MethodNotAllowed { allow } => {
                assert_eq!(allow, "GET, HEAD, OPTIONS");
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn test_registration_order_wins() {
        let mut table = RouteTable::new();
        table.bind(
            Method::GET,
            "/pages/special",
            RouteTarget::Direct {
                status: 200,
                body: Some("special".to_string()),
                content_type: None,
            },
        );
        table.bind(Method::GET, "/pages/:slug", RouteTarget::Page);

        // Exact binding registered first shadows the param binding
        assert!(matches!(
            table.lookup(&Method::GET, "/pages/special"),
            RouteLookup::Matched {
                target: RouteTarget::Direct { .. },
                ..
            }
        ));
        assert!(matches!(
            table.lookup(&Method::GET, "/pages/other"),
            RouteLookup::Matched {
                target: RouteTarget::Page,
                ..
            }
        ));
    }

    #[test]
    fn test_asset_dir_and_extras_from_config() {
        let content = ContentConfig {
            asset_dir: Some("static".to_string()),
            asset_prefix: "/assets".to_string(), // missing slash gets normalized
            extra_routes: vec![ExtraRoute {
                path: "/old-home".to_string(),
                action: ExtraAction::Redirect {
                    target: "/".to_string(),
                    code: 301,
                },
            }],
            ..ContentConfig::default()
        };
        let table = RouteTable::build(&content);

        assert!(matches!(
            table.lookup(&Method::GET, "/assets/site.css"),
            RouteLookup::Matched {
                target: RouteTarget::AssetDir { .. },
                ..
            }
        ));
        assert_eq!(table.lookup(&Method::GET, "/assetsfoo"), RouteLookup::NotFound);
        assert!(matches!(
            table.lookup(&Method::GET, "/old-home"),
            RouteLookup::Matched {
                target: RouteTarget::Redirect { code: 301, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_favicon_paths() {
        let table = default_table();
        assert!(matches!(
            table.lookup(&Method::GET, "/favicon.ico"),
            RouteLookup::Matched {
                target: RouteTarget::Favicon,
                ..
            }
        ));
        assert!(matches!(
            table.lookup(&Method::GET, "/favicon.svg"),
            RouteLookup::Matched {
                target: RouteTarget::Favicon,
                ..
            }
        ));
    }
}
