//! URL and template-path resolution.
//!
//! Everything in here is a pure function of the tab URL, the settings snapshot
//! and the environment table. Nothing is cached between calls and no I/O happens;
//! opening tabs and writing the clipboard is left to [`crate::dispatch`].

mod environment;
mod target;
mod template;

pub use environment::{
    resolve_button_url, resolve_environment_url, EnvironmentSelector, EnvironmentTable, HostSpec,
    Protocol, UnknownEnvironment,
};
pub use target::{LocalFilePath, NavigableUrl, ResolvedTarget};
pub use template::{error_fallback_path, resolve_local_file_path};

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Could not parse URL '{url}': {reason}")]
    UrlParse { url: String, reason: String },
    #[error("Project base path is not configured")]
    ProjectPathNotConfigured,
}

/// Parse the active tab's URL. Empty input and host-less URLs (`about:blank`,
/// `data:` and the like) are rejected since there is nothing to remap.
pub(crate) fn parse_tab_url(raw: &str) -> Result<Url, ResolveError> {
    let trimmed = raw.trim();
    let fail = |reason: &str| ResolveError::UrlParse {
        url: trimmed.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(fail("empty URL"));
    }
    let url = Url::parse(trimmed).map_err(|e| fail(&e.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(fail("URL has no host"));
    }
    Ok(url)
}
