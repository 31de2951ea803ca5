//! One button press: query the tab, resolve, dispatch.
//!
//! The popup and the one-shot CLI both go through these functions so they report
//! the same error kinds.

use thiserror::Error;

use crate::config::HopConfig;
use crate::dispatch::{plan_editor_open, ActionDispatcher, EditorAction};
use crate::resolve::{
    self, EnvironmentSelector, EnvironmentTable, LocalFilePath, NavigableUrl, ResolveError,
};
use crate::tab::{ActiveTabProvider, TabError};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Tab(#[from] TabError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Unsupported editor '{0}'")]
    UnsupportedEditor(String),
    #[error("{0:#}")]
    Dispatch(anyhow::Error),
}

// ── Resolve ──

pub fn resolve_environment(
    tab: &mut dyn ActiveTabProvider,
    selector: EnvironmentSelector,
    config: &HopConfig,
) -> Result<NavigableUrl, ActionError> {
    let tab_url = tab.active_tab_url()?;
    let table = EnvironmentTable::from_config(&config.environments);
    Ok(resolve::resolve_environment_url(
        &tab_url,
        selector,
        &config.settings,
        &table,
    )?)
}

/// Resolve by raw button id; unknown ids land on the `unknown` host.
pub fn resolve_button(
    tab: &mut dyn ActiveTabProvider,
    button_id: &str,
    config: &HopConfig,
) -> Result<NavigableUrl, ActionError> {
    let tab_url = tab.active_tab_url()?;
    let table = EnvironmentTable::from_config(&config.environments);
    Ok(resolve::resolve_button_url(
        &tab_url,
        button_id,
        &config.settings,
        &table,
    )?)
}

/// Resolve the template for the active tab. With `fallback` set, an unparsable
/// tab URL yields the `_views/error.tpl` marker instead of an error.
pub fn resolve_template(
    tab: &mut dyn ActiveTabProvider,
    config: &HopConfig,
    fallback: bool,
) -> Result<LocalFilePath, ActionError> {
    let tab_url = tab.active_tab_url()?;
    match resolve::resolve_local_file_path(&tab_url, &config.settings) {
        Err(err @ ResolveError::UrlParse { .. }) if fallback => {
            tracing::warn!("{}; using error template", err);
            resolve::error_fallback_path(&config.settings).ok_or(ActionError::Resolve(err))
        }
        other => Ok(other?),
    }
}

// ── Dispatch ──

/// Open the URL in a new tab and leave a copy on the clipboard.
pub fn open_environment(
    url: &NavigableUrl,
    dispatcher: &mut dyn ActionDispatcher,
) -> Result<String, ActionError> {
    let url = url.to_string();
    dispatcher.open_url(&url).map_err(ActionError::Dispatch)?;
    dispatcher.copy_text(&url).map_err(ActionError::Dispatch)?;
    Ok(format!("Opened {url} (copied)"))
}

/// Open the template in the preferred editor, or copy its path for editors
/// without a URI scheme.
pub fn open_template(
    path: &LocalFilePath,
    editor: &str,
    dispatcher: &mut dyn ActionDispatcher,
) -> Result<String, ActionError> {
    match plan_editor_open(path, editor) {
        EditorAction::OpenUri(uri) => {
            dispatcher.open_uri(&uri).map_err(ActionError::Dispatch)?;
            Ok(format!("Opened {path} in {}", editor.trim()))
        }
        EditorAction::CopyPath(raw) => {
            dispatcher.copy_text(&raw).map_err(ActionError::Dispatch)?;
            Ok(format!("Path copied: {raw}"))
        }
        EditorAction::Unsupported(name) => Err(ActionError::UnsupportedEditor(name)),
    }
}

pub fn copy_template_path(
    path: &LocalFilePath,
    dispatcher: &mut dyn ActionDispatcher,
) -> Result<String, ActionError> {
    dispatcher
        .copy_text(&path.absolute_path)
        .map_err(ActionError::Dispatch)?;
    Ok(format!("Path copied: {path}"))
}
