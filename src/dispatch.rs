use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;

use crate::resolve::LocalFilePath;

/// Side effects a resolved target can trigger
pub trait ActionDispatcher {
    /// Open `url` in a new browser tab
    fn open_url(&mut self, url: &str) -> Result<()>;
    /// Hand a custom-scheme URI (`vscode://file/...`) to the OS handler
    fn open_uri(&mut self, uri: &str) -> Result<()>;
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

/// Default browser via `webbrowser`, editor URIs via `open`, system clipboard
/// via `arboard`
#[derive(Default)]
pub struct SystemDispatcher {
    clipboard: Option<arboard::Clipboard>,
}

impl SystemDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> Result<&mut arboard::Clipboard> {
        if self.clipboard.is_none() {
            self.clipboard = Some(arboard::Clipboard::new().context("Failed to open clipboard")?);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Clipboard not initialized"))
    }
}

impl ActionDispatcher for SystemDispatcher {
    fn open_url(&mut self, url: &str) -> Result<()> {
        tracing::info!("Opening {}", url);
        webbrowser::open(url).with_context(|| format!("Failed to open {url}"))
    }

    fn open_uri(&mut self, uri: &str) -> Result<()> {
        tracing::info!("Handing {} to the OS", uri);
        open::that(uri).with_context(|| format!("Failed to open {uri}"))
    }

    fn copy_text(&mut self, text: &str) -> Result<()> {
        tracing::debug!("Copying {} bytes to clipboard", text.len());
        self.clipboard()?
            .set_text(text)
            .context("Failed to write clipboard")
    }
}

// ── Editors ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredEditor {
    VsCode,
    Cursor,
    Dreamweaver,
}

impl PreferredEditor {
    /// Key persisted in settings
    pub fn key(&self) -> &'static str {
        match self {
            PreferredEditor::VsCode => "vscode",
            PreferredEditor::Cursor => "cursor",
            PreferredEditor::Dreamweaver => "dreamweaver",
        }
    }

    /// URI scheme that opens a file; Dreamweaver registers none
    pub fn uri_scheme(&self) -> Option<&'static str> {
        match self {
            PreferredEditor::VsCode => Some("vscode"),
            PreferredEditor::Cursor => Some("cursor"),
            PreferredEditor::Dreamweaver => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            PreferredEditor::VsCode => PreferredEditor::Cursor,
            PreferredEditor::Cursor => PreferredEditor::Dreamweaver,
            PreferredEditor::Dreamweaver => PreferredEditor::VsCode,
        }
    }
}

impl fmt::Display for PreferredEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PreferredEditor::VsCode => "VS Code",
            PreferredEditor::Cursor => "Cursor",
            PreferredEditor::Dreamweaver => "Dreamweaver",
        })
    }
}

impl FromStr for PreferredEditor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vscode" | "code" | "vs code" => Ok(PreferredEditor::VsCode),
            "cursor" => Ok(PreferredEditor::Cursor),
            "dreamweaver" | "dw" => Ok(PreferredEditor::Dreamweaver),
            _ => Err(s.to_string()),
        }
    }
}

/// What opening a template in the preferred editor comes down to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    OpenUri(String),
    CopyPath(String),
    Unsupported(String),
}

/// Decide how to open `target` in `editor` (the raw settings value).
pub fn plan_editor_open(target: &LocalFilePath, editor: &str) -> EditorAction {
    match editor.parse::<PreferredEditor>() {
        Ok(editor) => match editor.uri_scheme() {
            Some(scheme) => EditorAction::OpenUri(editor_uri(scheme, target)),
            None => EditorAction::CopyPath(target.absolute_path.clone()),
        },
        Err(name) => EditorAction::Unsupported(name),
    }
}

/// `<scheme>://file/<path>` with forward slashes and no doubled slash for
/// Posix paths.
fn editor_uri(scheme: &str, target: &LocalFilePath) -> String {
    let path = target.forward_slashed();
    format!("{scheme}://file/{}", path.trim_start_matches('/'))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> LocalFilePath {
        LocalFilePath::new("C:\\proj\\_views\\a\\b.tpl")
    }

    #[test]
    fn vscode_gets_forward_slash_uri() {
        assert_eq!(
            plan_editor_open(&target(), "vscode"),
            EditorAction::OpenUri("vscode://file/C:/proj/_views/a/b.tpl".into())
        );
    }

    #[test]
    fn cursor_gets_its_own_scheme() {
        assert_eq!(
            plan_editor_open(&target(), "Cursor"),
            EditorAction::OpenUri("cursor://file/C:/proj/_views/a/b.tpl".into())
        );
    }

    #[test]
    fn posix_paths_do_not_double_the_slash() {
        let path = LocalFilePath::new("/srv/site/_views/a.tpl");
        assert_eq!(
            plan_editor_open(&path, "code"),
            EditorAction::OpenUri("vscode://file/srv/site/_views/a.tpl".into())
        );
    }

    #[test]
    fn dreamweaver_only_copies_raw_path() {
        assert_eq!(
            plan_editor_open(&target(), "dreamweaver"),
            EditorAction::CopyPath("C:\\proj\\_views\\a\\b.tpl".into())
        );
    }

    #[test]
    fn unknown_editor_is_unsupported() {
        assert_eq!(
            plan_editor_open(&target(), "notepad++"),
            EditorAction::Unsupported("notepad++".into())
        );
    }

    #[test]
    fn editor_keys_round_trip() {
        for editor in [
            PreferredEditor::VsCode,
            PreferredEditor::Cursor,
            PreferredEditor::Dreamweaver,
        ] {
            assert_eq!(editor.key().parse::<PreferredEditor>(), Ok(editor));
        }
    }
}
