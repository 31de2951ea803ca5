use serde::Serialize;
use std::fmt;

/// A browser destination, rendered as `scheme://host/path`.
///
/// `host` never ends with `/` and `path` never starts with one, so the
/// rendered string always has exactly one slash between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigableUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl NavigableUrl {
    pub fn new(scheme: impl Into<String>, host: &str, path: &str) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.trim().trim_end_matches('/').to_string(),
            path: path.trim_start_matches('/').to_string(),
        }
    }
}

impl fmt::Display for NavigableUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.host, self.path)
    }
}

/// Absolute path of a template file in the local checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFilePath {
    pub absolute_path: String,
}

impl LocalFilePath {
    pub fn new(absolute_path: impl Into<String>) -> Self {
        Self {
            absolute_path: absolute_path.into(),
        }
    }

    /// The path with every `\` turned into `/`, as editor URIs expect
    pub fn forward_slashed(&self) -> String {
        self.absolute_path.replace('\\', "/")
    }
}

impl fmt::Display for LocalFilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.absolute_path)
    }
}

/// Result of a single button press
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedTarget {
    NavigableUrl {
        url: String,
        #[serde(flatten)]
        parts: NavigableUrl,
    },
    LocalFilePath(LocalFilePath),
}

impl From<NavigableUrl> for ResolvedTarget {
    fn from(url: NavigableUrl) -> Self {
        ResolvedTarget::NavigableUrl {
            url: url.to_string(),
            parts: url,
        }
    }
}

impl From<LocalFilePath> for ResolvedTarget {
    fn from(path: LocalFilePath) -> Self {
        ResolvedTarget::LocalFilePath(path)
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedTarget::NavigableUrl { url, .. } => f.write_str(url),
            ResolvedTarget::LocalFilePath(path) => path.fmt(f),
        }
    }
}
