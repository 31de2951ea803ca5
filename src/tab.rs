use thiserror::Error;

/// Why the active tab's URL could not be read
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TabError {
    #[error("Tab query unavailable: {0}")]
    Unavailable(String),
    #[error("No active tab")]
    NoActiveTab,
    #[error("Active tab has no URL")]
    MissingUrl,
}

/// Source of the URL the user is looking at. Queried fresh on every action.
pub trait ActiveTabProvider {
    fn active_tab_url(&mut self) -> Result<String, TabError>;

    /// Short description for the top bar
    fn describe(&self) -> String;
}

/// A URL given up front (command line argument or typed into the popup)
#[derive(Debug, Clone, Default)]
pub struct FixedTab {
    url: Option<String>,
}

impl FixedTab {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    pub fn empty() -> Self {
        Self { url: None }
    }
}

impl ActiveTabProvider for FixedTab {
    fn active_tab_url(&mut self) -> Result<String, TabError> {
        match self.url.as_deref().map(str::trim) {
            None => Err(TabError::NoActiveTab),
            Some("") => Err(TabError::MissingUrl),
            Some(url) => Ok(url.to_string()),
        }
    }

    fn describe(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => "no tab".into(),
        }
    }
}

/// Reads the URL the user copied from the browser's address bar.
///
/// The clipboard handle is opened on first use and kept for the session.
#[derive(Default)]
pub struct ClipboardTab {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardTab {
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> Result<&mut arboard::Clipboard, TabError> {
        if self.clipboard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| TabError::Unavailable(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| TabError::Unavailable("clipboard not initialized".into()))
    }
}

impl ActiveTabProvider for ClipboardTab {
    fn active_tab_url(&mut self) -> Result<String, TabError> {
        let text = match self.clipboard()?.get_text() {
            Ok(text) => text,
            Err(arboard::Error::ContentNotAvailable) => return Err(TabError::MissingUrl),
            Err(e) => return Err(TabError::Unavailable(e.to_string())),
        };
        first_line(&text).ok_or(TabError::MissingUrl)
    }

    fn describe(&self) -> String {
        "clipboard".into()
    }
}

/// First non-blank line, trimmed. Address-bar copies sometimes carry a newline.
fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_tab_returns_url_every_time() {
        let mut tab = FixedTab::new(" https://example.com/a ");
        assert_eq!(tab.active_tab_url().unwrap(), "https://example.com/a");
        assert_eq!(tab.active_tab_url().unwrap(), "https://example.com/a");
    }

    #[test]
    fn empty_fixed_tab_has_no_active_tab() {
        assert_eq!(FixedTab::empty().active_tab_url(), Err(TabError::NoActiveTab));
    }

    #[test]
    fn blank_url_is_missing() {
        assert_eq!(FixedTab::new("  ").active_tab_url(), Err(TabError::MissingUrl));
    }

    #[test]
    fn first_line_skips_blank_lines() {
        assert_eq!(
            first_line("\n  https://example.com/x  \nignored"),
            Some("https://example.com/x".to_string())
        );
        assert_eq!(first_line(" \n\t\n"), None);
    }
}
