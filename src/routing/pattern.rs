//! Path pattern module
//!
//! Compiles route path strings into matchable patterns. Three shapes exist:
//! exact paths (`/about`), a single trailing `:param` segment
//! (`/pages/:slug`), and prefixes written with a trailing slash (`/assets/`).

/// Compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Whole-path equality
    Exact(String),
    /// Fixed prefix followed by exactly one non-empty segment
    Param { prefix: String, name: String },
    /// Path starts with the prefix
    Prefix(String),
}

impl PathPattern {
    /// Compile a pattern string.
    ///
    /// - `"/pages/:slug"` captures the final segment as `slug`
    /// - `"/assets/"` (trailing slash) matches any path under the prefix
    /// - anything else matches exactly
    pub fn parse(pattern: &str) -> Self {
        if let Some(idx) = pattern.rfind("/:") {
            let name = &pattern[idx + 2..];
            if !name.is_empty() && !name.contains('/') {
                return Self::Param {
                    prefix: pattern[..=idx].to_string(),
                    name: name.to_string(),
                };
            }
        }
        if pattern.len() > 1 && pattern.ends_with('/') {
            return Self::Prefix(pattern.to_string());
        }
        Self::Exact(pattern.to_string())
    }

    /// Match a request path, returning the captured parameter value if the
    /// pattern has one. `None` means no match.
    pub fn matches<'p>(&self, path: &'p str) -> Option<Option<&'p str>> {
        match self {
            Self::Exact(exact) => (path == exact).then_some(None),
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()).then_some(None),
            Self::Param { prefix, .. } => {
                let rest = path.strip_prefix(prefix.as_str())?;
                if rest.is_empty() || rest.contains('/') {
                    return None;
                }
                Some(Some(rest))
            }
        }
    }

    /// Name of the captured parameter, if any
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Self::Param { name, .. } => Some(name),
            _ => None,
        }
    }
}
