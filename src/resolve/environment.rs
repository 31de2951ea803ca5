use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Position;

use super::{parse_tab_url, NavigableUrl, ResolveError};
use crate::config::{EnvironmentsConfig, HostOverride, Settings};

const LOCAL_FALLBACK_HOST: &str = "localhost";
const UNKNOWN_HOST: &str = "unknown";

/// Which deployment a button targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentSelector {
    Local,
    Nd,
    Test,
    Production,
}

impl EnvironmentSelector {
    pub const ALL: [EnvironmentSelector; 4] = [
        EnvironmentSelector::Local,
        EnvironmentSelector::Nd,
        EnvironmentSelector::Test,
        EnvironmentSelector::Production,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EnvironmentSelector::Local => "LOCAL",
            EnvironmentSelector::Nd => "ND",
            EnvironmentSelector::Test => "TEST",
            EnvironmentSelector::Production => "PROD",
        }
    }

    /// Stable id used for button ids and the `--env` flag
    pub fn id(&self) -> &'static str {
        match self {
            EnvironmentSelector::Local => "local",
            EnvironmentSelector::Nd => "nd",
            EnvironmentSelector::Test => "test",
            EnvironmentSelector::Production => "production",
        }
    }
}

impl fmt::Display for EnvironmentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown environment '{0}' (expected local, nd, test or production)")]
pub struct UnknownEnvironment(pub String);

impl FromStr for EnvironmentSelector {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(EnvironmentSelector::Local),
            "nd" => Ok(EnvironmentSelector::Nd),
            "test" => Ok(EnvironmentSelector::Test),
            "production" | "prod" => Ok(EnvironmentSelector::Production),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

/// Host template plus the protocol to reach it with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub host_template: String,
    pub protocol: Protocol,
}

impl HostSpec {
    fn new(host_template: &str, protocol: Protocol) -> Self {
        Self {
            host_template: host_template.to_string(),
            protocol,
        }
    }

    fn with_override(mut self, over: Option<&HostOverride>) -> Self {
        if let Some(over) = over {
            if let Some(host) = over.host.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
                self.host_template = host.to_string();
            }
            if let Some(protocol) = over.protocol {
                self.protocol = protocol;
            }
        }
        self
    }

    pub fn host(&self, domain: &str) -> String {
        self.host_template.replace("{domain}", domain.trim())
    }
}

/// Remote environments keyed by selector. Local is not in the table: its host
/// comes from the user's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentTable {
    pub domain: String,
    pub nd: HostSpec,
    pub test: HostSpec,
    pub production: HostSpec,
}

impl Default for EnvironmentTable {
    fn default() -> Self {
        Self::from_config(&EnvironmentsConfig::default())
    }
}

impl EnvironmentTable {
    pub fn from_config(config: &EnvironmentsConfig) -> Self {
        Self {
            domain: config.domain.clone(),
            nd: HostSpec::new("nd.www.{domain}", Protocol::Http).with_override(config.nd.as_ref()),
            test: HostSpec::new("test.{domain}", Protocol::Https)
                .with_override(config.test.as_ref()),
            production: HostSpec::new("www.{domain}", Protocol::Https)
                .with_override(config.production.as_ref()),
        }
    }

    /// `(scheme, host)` the selector points at, before path joining
    pub fn base_for(&self, selector: EnvironmentSelector, settings: &Settings) -> (String, String) {
        let spec = match selector {
            EnvironmentSelector::Local => return local_base(settings),
            EnvironmentSelector::Nd => &self.nd,
            EnvironmentSelector::Test => &self.test,
            EnvironmentSelector::Production => &self.production,
        };
        (spec.protocol.as_str().to_string(), spec.host(&self.domain))
    }
}

/// Local host from settings, defaulting to `localhost` over http. A scheme typed
/// into the setting (`https://dev.local`) wins over the http default.
fn local_base(settings: &Settings) -> (String, String) {
    let configured = settings.local_base_url.trim();
    let (scheme, host) = match configured.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => (scheme.to_ascii_lowercase(), rest),
        _ => (Protocol::Http.as_str().to_string(), configured),
    };
    let host = host.trim_matches('/');
    if host.is_empty() {
        (scheme, LOCAL_FALLBACK_HOST.to_string())
    } else {
        (scheme, host.to_string())
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Everything after the authority: path, query and fragment, without leading slashes.
fn path_remainder(tab_url: &str) -> Result<String, ResolveError> {
    let url = parse_tab_url(tab_url)?;
    Ok(url[Position::BeforePath..].trim_start_matches('/').to_string())
}

/// Map the page open in `tab_url` onto the same page in another environment.
pub fn resolve_environment_url(
    tab_url: &str,
    selector: EnvironmentSelector,
    settings: &Settings,
    table: &EnvironmentTable,
) -> Result<NavigableUrl, ResolveError> {
    let remainder = path_remainder(tab_url)?;
    let (scheme, host) = table.base_for(selector, settings);
    Ok(NavigableUrl::new(scheme, &host, &remainder))
}

/// Like [`resolve_environment_url`] but keyed by a raw button id. Ids that name
/// no environment resolve to `https://unknown/<path>`.
pub fn resolve_button_url(
    tab_url: &str,
    button_id: &str,
    settings: &Settings,
    table: &EnvironmentTable,
) -> Result<NavigableUrl, ResolveError> {
    match button_id.parse::<EnvironmentSelector>() {
        Ok(selector) => resolve_environment_url(tab_url, selector, settings, table),
        Err(_) => {
            tracing::debug!(button_id, "unrecognized environment button");
            let remainder = path_remainder(tab_url)?;
            Ok(NavigableUrl::new(Protocol::Https.as_str(), UNKNOWN_HOST, &remainder))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(url: &str, selector: EnvironmentSelector) -> String {
        resolve_environment_url(url, selector, &Settings::default(), &EnvironmentTable::default())
            .unwrap()
            .to_string()
    }

    fn with_local(local: &str) -> Settings {
        Settings {
            local_base_url: local.into(),
            ..Settings::default()
        }
    }

    // ── Remote environments ──

    #[test]
    fn nd_forces_http() {
        assert_eq!(
            resolve("https://example.com/a/b", EnvironmentSelector::Nd),
            "http://nd.www.example.com/a/b"
        );
    }

    #[test]
    fn production_with_empty_path() {
        assert_eq!(
            resolve("https://example.com", EnvironmentSelector::Production),
            "https://www.example.com/"
        );
    }

    #[test]
    fn test_env_uses_https() {
        assert_eq!(
            resolve("http://www.example.com/shop/cart", EnvironmentSelector::Test),
            "https://test.example.com/shop/cart"
        );
    }

    #[test]
    fn http_source_keeps_first_path_character() {
        assert_eq!(
            resolve("http://localhost:8080/about", EnvironmentSelector::Production),
            "https://www.example.com/about"
        );
    }

    #[test]
    fn query_and_fragment_are_carried_over() {
        assert_eq!(
            resolve("https://www.example.com/search?q=shoes&page=2#results", EnvironmentSelector::Test),
            "https://test.example.com/search?q=shoes&page=2#results"
        );
    }

    #[test]
    fn no_double_slash_between_host_and_path() {
        for selector in EnvironmentSelector::ALL {
            let url = resolve("https://example.com//deep//path", selector);
            let after_scheme = url.split_once("://").unwrap().1;
            assert!(!after_scheme.starts_with('/'));
            let (_, path) = after_scheme.split_once('/').unwrap();
            assert!(!path.starts_with('/'), "{url}");
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        let settings = with_local("dev.local:3000");
        let table = EnvironmentTable::default();
        for selector in EnvironmentSelector::ALL {
            let first = resolve_environment_url("https://example.com/x", selector, &settings, &table);
            let second = resolve_environment_url("https://example.com/x", selector, &settings, &table);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn domain_and_overrides_come_from_config() {
        let config = EnvironmentsConfig {
            domain: "acme.io".into(),
            test: Some(HostOverride {
                host: Some("qa.{domain}/".into()),
                protocol: Some(Protocol::Http),
            }),
            ..EnvironmentsConfig::default()
        };
        let table = EnvironmentTable::from_config(&config);
        let settings = Settings::default();

        let test = resolve_environment_url("https://acme.io/p", EnvironmentSelector::Test, &settings, &table)
            .unwrap();
        assert_eq!(test.to_string(), "http://qa.acme.io/p");

        let prod = resolve_environment_url("https://acme.io/p", EnvironmentSelector::Production, &settings, &table)
            .unwrap();
        assert_eq!(prod.to_string(), "https://www.acme.io/p");
    }

    // ── Local ──

    #[test]
    fn local_defaults_to_localhost() {
        assert_eq!(
            resolve("https://www.example.com/a", EnvironmentSelector::Local),
            "http://localhost/a"
        );
    }

    #[test]
    fn local_whitespace_only_falls_back_to_localhost() {
        let url = resolve_environment_url(
            "https://www.example.com/a",
            EnvironmentSelector::Local,
            &with_local("   "),
            &EnvironmentTable::default(),
        )
        .unwrap();
        assert_eq!(url.to_string(), "http://localhost/a");
    }

    #[test]
    fn local_base_is_trimmed_and_slash_normalized() {
        let url = resolve_environment_url(
            "https://www.example.com/a/b",
            EnvironmentSelector::Local,
            &with_local("  dev.local:3000/site//  "),
            &EnvironmentTable::default(),
        )
        .unwrap();
        assert_eq!(url.to_string(), "http://dev.local:3000/site/a/b");
    }

    #[test]
    fn local_base_scheme_is_respected() {
        let url = resolve_environment_url(
            "https://www.example.com/a",
            EnvironmentSelector::Local,
            &with_local("HTTPS://dev.local:8443"),
            &EnvironmentTable::default(),
        )
        .unwrap();
        assert_eq!(url.scheme, "https");
        assert_eq!(url.to_string(), "https://dev.local:8443/a");
    }

    #[test]
    fn local_base_leading_slashes_are_dropped() {
        let table = EnvironmentTable::default();
        for (local, expected) in [
            ("//dev.local", "http://dev.local/a"),
            ("https:////dev.local/", "https://dev.local/a"),
            ("///", "http://localhost/a"),
        ] {
            let url = resolve_environment_url(
                "https://www.example.com/a",
                EnvironmentSelector::Local,
                &with_local(local),
                &table,
            )
            .unwrap();
            assert_eq!(url.to_string(), expected, "{local:?}");
        }
    }

    // ── Failures and raw ids ──

    #[test]
    fn malformed_url_fails() {
        let table = EnvironmentTable::default();
        let settings = Settings::default();
        for bad in ["", "example.com/a", "https://"] {
            let err = resolve_environment_url(bad, EnvironmentSelector::Test, &settings, &table);
            assert!(matches!(err, Err(ResolveError::UrlParse { .. })), "{bad:?}");
        }
    }

    #[test]
    fn unknown_button_goes_to_unknown_host() {
        let url = resolve_button_url(
            "https://example.com/a",
            "staging",
            &Settings::default(),
            &EnvironmentTable::default(),
        )
        .unwrap();
        assert_eq!(url.to_string(), "https://unknown/a");
    }

    #[test]
    fn known_button_ids_match_selectors() {
        let url = resolve_button_url(
            "https://example.com/a",
            "ND",
            &Settings::default(),
            &EnvironmentTable::default(),
        )
        .unwrap();
        assert_eq!(url.to_string(), "http://nd.www.example.com/a");
    }

    #[test]
    fn selector_parsing() {
        assert_eq!("prod".parse::<EnvironmentSelector>(), Ok(EnvironmentSelector::Production));
        assert_eq!(" Local ".parse::<EnvironmentSelector>(), Ok(EnvironmentSelector::Local));
        assert_eq!(
            "qa".parse::<EnvironmentSelector>(),
            Err(UnknownEnvironment("qa".into()))
        );
        for selector in EnvironmentSelector::ALL {
            assert_eq!(selector.id().parse::<EnvironmentSelector>(), Ok(selector));
        }
    }
}
