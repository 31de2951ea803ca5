use crate::actions::{self, ActionError};
use crate::config::{self, HopConfig, SettingsItem};
use crate::dispatch::ActionDispatcher;
use crate::resolve::{EnvironmentSelector, ResolvedTarget};
use crate::tab::{ActiveTabProvider, FixedTab};
use std::path::PathBuf;

/// Ticks (~100ms each) a status message stays on screen
const STATUS_TICKS: usize = 20;

// ── Enums ──

/// One row of the popup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Button {
    Environment(EnvironmentSelector),
    OpenTemplate,
    CopyTemplatePath,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::Environment(EnvironmentSelector::Local),
        Button::Environment(EnvironmentSelector::Nd),
        Button::Environment(EnvironmentSelector::Test),
        Button::Environment(EnvironmentSelector::Production),
        Button::OpenTemplate,
        Button::CopyTemplatePath,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Button::Environment(selector) => selector.label(),
            Button::OpenTemplate => "Open template",
            Button::CopyTemplatePath => "Copy template path",
        }
    }

    pub fn key_hint(&self) -> char {
        match self {
            Button::Environment(EnvironmentSelector::Local) => '1',
            Button::Environment(EnvironmentSelector::Nd) => '2',
            Button::Environment(EnvironmentSelector::Test) => '3',
            Button::Environment(EnvironmentSelector::Production) => '4',
            Button::OpenTemplate => 'e',
            Button::CopyTemplatePath => 'y',
        }
    }

    pub fn from_key(c: char) -> Option<Button> {
        Button::ALL.into_iter().find(|b| b.key_hint() == c)
    }
}

/// Whether we're navigating or typing a URL
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    UrlPrompt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

/// Settings overlay state
#[derive(Debug, Clone)]
pub struct SettingsOverlay {
    pub selected: usize,
    /// Snapshot of config at overlay open time, for Cancel revert
    pub saved_config: HopConfig,
    /// Text being typed into the selected field, if editing
    pub editing: Option<String>,
}

// ── App ──

pub struct App {
    pub config: HopConfig,
    /// Where Save writes; `None` when no config directory could be found
    pub config_path: Option<PathBuf>,

    /// Highlighted button
    pub selected: usize,
    pub input_mode: InputMode,
    pub url_input: String,
    pub overlay: Option<SettingsOverlay>,

    /// Last thing a button resolved to, shown in the details panel
    pub last_target: Option<ResolvedTarget>,
    pub status: Option<Status>,
    status_ticks: usize,
    pub should_quit: bool,

    tab: Box<dyn ActiveTabProvider>,
    dispatcher: Box<dyn ActionDispatcher>,
}

impl App {
    pub fn new(
        config: HopConfig,
        config_path: Option<PathBuf>,
        tab: Box<dyn ActiveTabProvider>,
        dispatcher: Box<dyn ActionDispatcher>,
    ) -> Self {
        Self {
            config,
            config_path,
            selected: 0,
            input_mode: InputMode::Normal,
            url_input: String::new(),
            overlay: None,
            last_target: None,
            status: None,
            status_ticks: 0,
            should_quit: false,
            tab,
            dispatcher,
        }
    }

    pub fn tab_source(&self) -> String {
        self.tab.describe()
    }

    pub fn selected_button(&self) -> Button {
        Button::ALL[self.selected.min(Button::ALL.len() - 1)]
    }

    // ── Navigation ──

    pub fn select_next(&mut self) {
        if self.selected + 1 < Button::ALL.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn press_selected(&mut self) {
        self.press(self.selected_button());
    }

    // ── Actions ──

    /// Run one query -> resolve -> dispatch chain. Failures end up in the
    /// status line; the popup stays usable.
    pub fn press(&mut self, button: Button) {
        if let Some(idx) = Button::ALL.iter().position(|b| *b == button) {
            self.selected = idx;
        }
        let result = match button {
            Button::Environment(selector) => self.jump_to(selector),
            Button::OpenTemplate => self.open_template(),
            Button::CopyTemplatePath => self.copy_template_path(),
        };
        match result {
            Ok(msg) => self.notify(&msg),
            Err(err) => {
                tracing::warn!(button = button.label(), "{}", err);
                self.notify_error(&err.to_string());
            }
        }
    }

    fn jump_to(&mut self, selector: EnvironmentSelector) -> Result<String, ActionError> {
        let url = actions::resolve_environment(self.tab.as_mut(), selector, &self.config)?;
        tracing::info!(env = selector.id(), "Resolved {}", url);
        self.last_target = Some(url.clone().into());
        actions::open_environment(&url, self.dispatcher.as_mut())
    }

    fn open_template(&mut self) -> Result<String, ActionError> {
        let path = actions::resolve_template(self.tab.as_mut(), &self.config, false)?;
        self.last_target = Some(path.clone().into());
        actions::open_template(
            &path,
            &self.config.settings.preferred_editor,
            self.dispatcher.as_mut(),
        )
    }

    fn copy_template_path(&mut self) -> Result<String, ActionError> {
        let path = actions::resolve_template(self.tab.as_mut(), &self.config, false)?;
        self.last_target = Some(path.clone().into());
        actions::copy_template_path(&path, self.dispatcher.as_mut())
    }

    // ── URL prompt ──

    pub fn start_url_prompt(&mut self) {
        self.url_input.clear();
        self.input_mode = InputMode::UrlPrompt;
    }

    /// Use the typed URL as the active tab for the rest of the session
    pub fn submit_url_prompt(&mut self) {
        let url = self.url_input.trim().to_string();
        self.input_mode = InputMode::Normal;
        self.url_input.clear();
        if url.is_empty() {
            return;
        }
        self.tab = Box::new(FixedTab::new(url.clone()));
        self.notify(&format!("Tab URL set to {url}"));
    }

    pub fn cancel_url_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.url_input.clear();
    }

    // ── Settings overlay ──

    pub fn open_settings(&mut self) {
        self.overlay = Some(SettingsOverlay {
            selected: config::first_settings_index(),
            saved_config: self.config.clone(),
            editing: None,
        });
    }

    pub fn is_editing_setting(&self) -> bool {
        matches!(&self.overlay, Some(SettingsOverlay { editing: Some(_), .. }))
    }

    pub fn overlay_next(&mut self) {
        if let Some(overlay) = &mut self.overlay {
            let items = config::settings_items();
            // Skip section headers when navigating down
            let mut next = overlay.selected + 1;
            while next < items.len() && items[next].is_header() {
                next += 1;
            }
            if next < items.len() {
                overlay.selected = next;
            }
        }
    }

    pub fn overlay_prev(&mut self) {
        if let Some(overlay) = &mut self.overlay {
            let items = config::settings_items();
            // Skip section headers when navigating up
            if overlay.selected > 0 {
                let mut prev = overlay.selected - 1;
                while prev > 0 && items[prev].is_header() {
                    prev -= 1;
                }
                if !items[prev].is_header() {
                    overlay.selected = prev;
                }
            }
        }
    }

    /// Enter: start editing a text field, or cycle a choice
    pub fn overlay_select(&mut self) {
        let items = config::settings_items();
        let Some(overlay) = &mut self.overlay else {
            return;
        };
        match items.get(overlay.selected) {
            Some(SettingsItem::TextField { get, .. }) => {
                overlay.editing = Some(get(&self.config));
            }
            Some(SettingsItem::Choice { cycle, .. }) => cycle(&mut self.config),
            _ => {}
        }
    }

    pub fn edit_push(&mut self, c: char) {
        if let Some(SettingsOverlay { editing: Some(buf), .. }) = &mut self.overlay {
            buf.push(c);
        }
    }

    pub fn edit_pop(&mut self) {
        if let Some(SettingsOverlay { editing: Some(buf), .. }) = &mut self.overlay {
            buf.pop();
        }
    }

    /// Write the edit buffer into the config (not yet saved to disk)
    pub fn edit_commit(&mut self) {
        let items = config::settings_items();
        let Some(overlay) = &mut self.overlay else {
            return;
        };
        if let Some(value) = overlay.editing.take() {
            if let Some(SettingsItem::TextField { set, .. }) = items.get(overlay.selected) {
                set(&mut self.config, value.trim().to_string());
            }
        }
    }

    pub fn edit_cancel(&mut self) {
        if let Some(overlay) = &mut self.overlay {
            overlay.editing = None;
        }
    }

    /// Validate, save settings to disk and close the overlay. Invalid settings
    /// keep the overlay open.
    pub fn settings_save(&mut self) {
        let issues = self.config.validate();
        if let Some(issue) = issues.first() {
            self.notify_error(&issue.to_string());
            return;
        }

        let result = match &self.config_path {
            Some(path) => config::save_config_to(&self.config, path),
            None => Err(anyhow::anyhow!("Could not determine config directory")),
        };
        match result {
            Ok(()) => self.notify("Settings saved"),
            Err(e) => {
                tracing::warn!("Failed to save settings: {:#}", e);
                self.notify_error(&format!("Failed to save: {e}"));
            }
        }
        self.overlay = None;
    }

    /// Revert settings to the saved snapshot and close the overlay
    pub fn settings_cancel(&mut self) {
        if let Some(overlay) = self.overlay.take() {
            self.config = overlay.saved_config;
        }
    }

    // ── Notifications ──

    pub fn notify(&mut self, msg: &str) {
        self.status = Some(Status {
            message: msg.to_string(),
            is_error: false,
        });
        self.status_ticks = 0;
    }

    pub fn notify_error(&mut self, msg: &str) {
        self.status = Some(Status {
            message: msg.to_string(),
            is_error: true,
        });
        self.status_ticks = 0;
    }

    /// Tick called on every event loop iteration — used for notification auto-clear
    pub fn tick(&mut self) {
        if self.status.is_some() {
            self.status_ticks += 1;
            if self.status_ticks > STATUS_TICKS {
                self.status = None;
                self.status_ticks = 0;
            }
        }
    }
}
