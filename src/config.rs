use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dispatch::PreferredEditor;
use crate::resolve::Protocol;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HopConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub environments: EnvironmentsConfig,
}

/// [settings] section: the user-editable record the resolvers read.
///
/// Field aliases accept the key names older setups persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Host (optionally with scheme and port) used by the Local button
    #[serde(default, alias = "LocalUrl", alias = "LocalBaseUrl")]
    pub local_base_url: String,
    /// Checkout root that contains the `_views` template tree
    #[serde(default, alias = "ProjectBasePath")]
    pub project_base_path: String,
    /// "vscode", "cursor" or "dreamweaver"
    #[serde(default = "default_editor", alias = "PreferredEditor")]
    pub preferred_editor: String,
    #[serde(default)]
    pub path_style: PathStyle,
}

/// Separator convention of the filesystem the project lives on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    #[default]
    Windows,
    Posix,
}

impl PathStyle {
    pub fn separator(&self) -> char {
        match self {
            PathStyle::Windows => '\\',
            PathStyle::Posix => '/',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PathStyle::Windows => "windows",
            PathStyle::Posix => "posix",
        }
    }

    fn next(&self) -> Self {
        match self {
            PathStyle::Windows => PathStyle::Posix,
            PathStyle::Posix => PathStyle::Windows,
        }
    }
}

/// [environments] section. `{domain}` in a host template is replaced by `domain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentsConfig {
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nd: Option<HostOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<HostOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<HostOverride>,
}

/// Per-environment override of the built-in host table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

fn default_editor() -> String {
    "vscode".into()
}

fn default_domain() -> String {
    "example.com".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            local_base_url: String::new(),
            project_base_path: String::new(),
            preferred_editor: default_editor(),
            path_style: PathStyle::default(),
        }
    }
}

impl Default for EnvironmentsConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            nd: None,
            test: None,
            production: None,
        }
    }
}

// ── Validation ──

/// A problem that blocks saving the settings form
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsIssue {
    #[error("Unsupported editor '{0}' (use vscode, cursor or dreamweaver)")]
    UnsupportedEditor(String),
    #[error("Local base URL '{0}' is not a valid host")]
    InvalidLocalBaseUrl(String),
    #[error("Project base path '{0}' must be absolute")]
    RelativeProjectPath(String),
    #[error("Domain '{0}' is not a valid host name")]
    InvalidDomain(String),
}

impl HopConfig {
    /// Everything the settings overlay can edit: the [settings] fields plus the
    /// environment domain.
    pub fn validate(&self) -> Vec<SettingsIssue> {
        let mut issues = self.settings.validate();
        if !is_valid_domain(&self.environments.domain) {
            issues.push(SettingsIssue::InvalidDomain(
                self.environments.domain.trim().to_string(),
            ));
        }
        issues
    }
}

/// A bare host such as `example.com`: no scheme, path or whitespace.
fn is_valid_domain(domain: &str) -> bool {
    let domain = domain.trim();
    !domain.is_empty()
        && !domain.contains('/')
        && !domain.chars().any(char::is_whitespace)
        && url::Url::parse(&format!("https://{domain}"))
            .map(|u| u.host_str().is_some_and(|h| !h.is_empty()))
            .unwrap_or(false)
}

impl Settings {
    /// Check the fields a user can type into. Empty fields are valid: they fall
    /// back to `localhost` and "not configured" respectively.
    pub fn validate(&self) -> Vec<SettingsIssue> {
        let mut issues = Vec::new();

        if self.preferred_editor.parse::<PreferredEditor>().is_err() {
            issues.push(SettingsIssue::UnsupportedEditor(self.preferred_editor.clone()));
        }

        let local = self.local_base_url.trim();
        if !local.is_empty() {
            let candidate = if local.contains("://") {
                local.to_string()
            } else {
                format!("http://{local}")
            };
            let valid = !local.chars().any(char::is_whitespace)
                && url::Url::parse(&candidate)
                    .map(|u| u.host_str().is_some_and(|h| !h.is_empty()))
                    .unwrap_or(false);
            if !valid {
                issues.push(SettingsIssue::InvalidLocalBaseUrl(local.to_string()));
            }
        }

        let base = self.project_base_path.trim();
        if !base.is_empty() && !is_absolute_path(base, self.path_style) {
            issues.push(SettingsIssue::RelativeProjectPath(base.to_string()));
        }

        issues
    }
}

/// Absolute for the configured style, independent of the host OS:
/// `C:\x`, `C:/x` and `\\server\share` on Windows, `/x` on Posix.
fn is_absolute_path(path: &str, style: PathStyle) -> bool {
    match style {
        PathStyle::Posix => path.starts_with('/'),
        PathStyle::Windows => {
            let bytes = path.as_bytes();
            let drive = bytes.len() >= 3
                && bytes[0].is_ascii_alphabetic()
                && bytes[1] == b':'
                && (bytes[2] == b'\\' || bytes[2] == b'/');
            drive || path.starts_with("\\\\")
        }
    }
}

// ── Load / save ──

/// Global config location (~/.config/hop/config.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hop").join("config.toml"))
}

/// Load config by merging global defaults with per-project overrides.
/// Priority: `<project_dir>/.hop.toml` > global `~/.config/hop/config.toml` > built-in defaults.
pub fn load_config(project_dir: &Path) -> HopConfig {
    load_config_from(global_config_path().as_deref(), &project_dir.join(".hop.toml"))
}

/// Same as [`load_config`] with explicit file locations.
pub fn load_config_from(global_path: Option<&Path>, local_path: &Path) -> HopConfig {
    let global_table = global_path.and_then(read_table);
    let local_table = read_table(local_path);

    let merged = match (global_table, local_table) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return HopConfig::default(),
    };

    match merged.try_into() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Invalid hop config, using defaults: {}", e);
            HopConfig::default()
        }
    }
}

fn read_table(path: &Path) -> Option<toml::Table> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Table>(&content) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Write config to `path`, creating parent directories.
pub fn save_config_to(config: &HopConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).with_context(|| format!("Could not write {}", path.display()))?;
    tracing::info!("Saved settings to {}", path.display());
    Ok(())
}

// ── Settings overlay items ──

/// Settings item types for the settings overlay UI.
#[derive(Debug, Clone)]
pub enum SettingsItem {
    SectionHeader(String),
    TextField {
        label: String,
        get: fn(&HopConfig) -> String,
        set: fn(&mut HopConfig, String),
    },
    Choice {
        label: String,
        get: fn(&HopConfig) -> String,
        cycle: fn(&mut HopConfig),
    },
}

impl SettingsItem {
    pub fn is_header(&self) -> bool {
        matches!(self, SettingsItem::SectionHeader(_))
    }
}

/// Build the list of settings items for the settings overlay.
pub fn settings_items() -> Vec<SettingsItem> {
    vec![
        SettingsItem::SectionHeader("Settings".into()),
        SettingsItem::TextField {
            label: "Local base URL".into(),
            get: |c| c.settings.local_base_url.clone(),
            set: |c, v| c.settings.local_base_url = v,
        },
        SettingsItem::TextField {
            label: "Project base path".into(),
            get: |c| c.settings.project_base_path.clone(),
            set: |c, v| c.settings.project_base_path = v,
        },
        SettingsItem::Choice {
            label: "Preferred editor".into(),
            get: |c| c.settings.preferred_editor.clone(),
            cycle: |c| {
                let next = match c.settings.preferred_editor.parse::<PreferredEditor>() {
                    Ok(editor) => editor.next(),
                    Err(_) => PreferredEditor::VsCode,
                };
                c.settings.preferred_editor = next.key().to_string();
            },
        },
        SettingsItem::Choice {
            label: "Path style".into(),
            get: |c| c.settings.path_style.label().to_string(),
            cycle: |c| c.settings.path_style = c.settings.path_style.next(),
        },
        SettingsItem::SectionHeader("Environments".into()),
        SettingsItem::TextField {
            label: "Domain".into(),
            get: |c| c.environments.domain.clone(),
            set: |c, v| c.environments.domain = v,
        },
    ]
}

/// Index of the first selectable (non-header) item
pub fn first_settings_index() -> usize {
    settings_items()
        .iter()
        .position(|item| !item.is_header())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_use_vscode_and_windows_paths() {
        let config = HopConfig::default();
        assert_eq!(config.settings.preferred_editor, "vscode");
        assert_eq!(config.settings.path_style, PathStyle::Windows);
        assert!(config.settings.local_base_url.is_empty());
        assert!(config.settings.project_base_path.is_empty());
        assert_eq!(config.environments.domain, "example.com");
    }

    #[test]
    fn missing_files_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(
            Some(&dir.path().join("nope.toml")),
            &dir.path().join(".hop.toml"),
        );
        assert_eq!(config, HopConfig::default());
    }

    #[test]
    fn legacy_key_names_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".hop.toml");
        fs::write(
            &local,
            "[settings]\nLocalUrl = \"dev.local:8080\"\nProjectBasePath = 'C:\\proj'\nPreferredEditor = \"cursor\"\n",
        )
        .unwrap();

        let config = load_config_from(None, &local);
        assert_eq!(config.settings.local_base_url, "dev.local:8080");
        assert_eq!(config.settings.project_base_path, "C:\\proj");
        assert_eq!(config.settings.preferred_editor, "cursor");
    }

    #[test]
    fn local_file_overrides_global_field_by_field() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join(".hop.toml");
        fs::write(
            &global,
            "[settings]\nlocal_base_url = \"localhost:3000\"\npreferred_editor = \"cursor\"\n\n[environments]\ndomain = \"acme.io\"\n",
        )
        .unwrap();
        fs::write(&local, "[settings]\npreferred_editor = \"dreamweaver\"\n").unwrap();

        let config = load_config_from(Some(&global), &local);
        assert_eq!(config.settings.local_base_url, "localhost:3000");
        assert_eq!(config.settings.preferred_editor, "dreamweaver");
        assert_eq!(config.environments.domain, "acme.io");
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".hop.toml");
        fs::write(&local, "[settings]\npath_style = \"amiga\"\n").unwrap();
        assert_eq!(load_config_from(None, &local), HopConfig::default());
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = HopConfig::default();
        config.settings.project_base_path = "/srv/site".into();
        config.settings.path_style = PathStyle::Posix;
        config.environments.test = Some(HostOverride {
            host: Some("qa.{domain}".into()),
            protocol: Some(Protocol::Http),
        });
        save_config_to(&config, &path).unwrap();

        assert_eq!(load_config_from(Some(&path), &dir.path().join("none.toml")), config);
    }

    #[test]
    fn empty_settings_are_valid() {
        assert!(Settings::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_unknown_editor() {
        let settings = Settings {
            preferred_editor: "notepad".into(),
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            vec![SettingsIssue::UnsupportedEditor("notepad".into())]
        );
    }

    #[test]
    fn validate_flags_bad_local_url() {
        let settings = Settings {
            local_base_url: "local host".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate().as_slice(),
            [SettingsIssue::InvalidLocalBaseUrl(_)]
        ));

        let ok = Settings {
            local_base_url: "https://dev.local:8443/".into(),
            ..Settings::default()
        };
        assert!(ok.validate().is_empty());
    }

    #[test]
    fn config_validate_rejects_bad_domains() {
        assert!(HopConfig::default().validate().is_empty());

        for domain in ["", "   ", "exa mple.com", "example.com/a", "https://example.com"] {
            let mut config = HopConfig::default();
            config.environments.domain = domain.into();
            assert_eq!(
                config.validate(),
                vec![SettingsIssue::InvalidDomain(domain.trim().into())],
                "{domain:?}"
            );
        }

        let mut config = HopConfig::default();
        config.environments.domain = " corp.internal ".into();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn config_validate_includes_settings_issues() {
        let mut config = HopConfig::default();
        config.settings.preferred_editor = "notepad".into();
        config.environments.domain = String::new();
        assert_eq!(
            config.validate(),
            vec![
                SettingsIssue::UnsupportedEditor("notepad".into()),
                SettingsIssue::InvalidDomain(String::new()),
            ]
        );
    }

    #[test]
    fn validate_checks_absolute_path_per_style() {
        let windows = Settings {
            project_base_path: "C:\\proj".into(),
            ..Settings::default()
        };
        assert!(windows.validate().is_empty());

        let relative = Settings {
            project_base_path: "proj\\site".into(),
            ..Settings::default()
        };
        assert!(matches!(
            relative.validate().as_slice(),
            [SettingsIssue::RelativeProjectPath(_)]
        ));

        let posix = Settings {
            project_base_path: "/home/me/site".into(),
            path_style: PathStyle::Posix,
            ..Settings::default()
        };
        assert!(posix.validate().is_empty());
    }

    #[test]
    fn editor_choice_cycles_through_supported_editors() {
        let items = settings_items();
        let cycle = items
            .iter()
            .find_map(|item| match item {
                SettingsItem::Choice { label, cycle, .. } if label == "Preferred editor" => {
                    Some(*cycle)
                }
                _ => None,
            })
            .unwrap();

        let mut config = HopConfig::default();
        cycle(&mut config);
        assert_eq!(config.settings.preferred_editor, "cursor");
        cycle(&mut config);
        assert_eq!(config.settings.preferred_editor, "dreamweaver");
        cycle(&mut config);
        assert_eq!(config.settings.preferred_editor, "vscode");

        config.settings.preferred_editor = "emacs".into();
        cycle(&mut config);
        assert_eq!(config.settings.preferred_editor, "vscode");
    }

    #[test]
    fn first_selectable_item_skips_header() {
        let items = settings_items();
        assert!(items[0].is_header());
        assert_eq!(first_settings_index(), 1);
    }
}
