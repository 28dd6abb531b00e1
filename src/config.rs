//! Extraction rule configuration.
//!
//! The structural patterns used to recognise airports and terminals are plain
//! configuration values. They default to the current layout of the lounge
//! site and can be overridden from a YAML file when the markup changes:
//!
//! ```yaml
//! airport:
//!   pattern: '<a class="link-arrow thin[^"]*" href="(?P<url>/lounges/[^"]+)"[^>]*>\s*(?P<name>[^<]+)<span class="icon-caret-right"></span>\s*</a>'
//!   max_path_separators: 3
//! terminal:
//!   pattern: '<div class="terminal-name "[^>]*>\s*<div class="terminal-name-text">\s*(?P<name>[^<]+)\s*</div>\s*</div>'
//! ```
//!
//! Any section or field left out of the file keeps its default.

use crate::scrapers::{AirportRule, TerminalRule};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

/// Default airport row pattern: a `link-arrow thin` anchor into `/lounges/`
/// whose text is followed by the caret icon.
pub const DEFAULT_AIRPORT_PATTERN: &str = r#"<a class="link-arrow thin[^"]*" href="(?P<url>/lounges/[^"]+)"[^>]*>\s*(?P<name>[^<]+)<span class="icon-caret-right"></span>\s*</a>"#;

/// Default terminal heading pattern.
pub const DEFAULT_TERMINAL_PATTERN: &str = r#"<div class="terminal-name "[^>]*>\s*<div class="terminal-name-text">\s*(?P<name>[^<]+)\s*</div>\s*</div>"#;

/// `/lounges/<country>/<city>-<airport>` has exactly three separators.
pub const DEFAULT_MAX_PATH_SEPARATORS: usize = 3;

/// Uncompiled extraction rules for every entity type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    pub airport: AirportRuleConfig,
    pub terminal: TerminalRuleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AirportRuleConfig {
    /// Regex with named groups `url` and `name`.
    pub pattern: String,
    /// Links with more `/` characters than this are not airport pages.
    pub max_path_separators: usize,
}

impl Default for AirportRuleConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_AIRPORT_PATTERN.to_string(),
            max_path_separators: DEFAULT_MAX_PATH_SEPARATORS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TerminalRuleConfig {
    /// Regex with a named group `name`.
    pub pattern: String,
}

impl Default for TerminalRuleConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TERMINAL_PATTERN.to_string(),
        }
    }
}

/// Compiled rules, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct Rules {
    pub airports: AirportRule,
    pub terminals: TerminalRule,
}

impl RulesConfig {
    /// Parse rules from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Compile every pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid regex or is missing
    /// one of its required named capture groups.
    pub fn compile(&self) -> Result<Rules, Box<dyn Error>> {
        Ok(Rules {
            airports: AirportRule::new(&self.airport.pattern, self.airport.max_path_separators)?,
            terminals: TerminalRule::new(&self.terminal.pattern)?,
        })
    }
}

/// Load and compile extraction rules.
///
/// With no path, the built-in defaults are used. Otherwise the YAML file at
/// `path` is read and merged over the defaults.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub async fn load_rules(path: Option<&Path>) -> Result<Rules, Box<dyn Error>> {
    let config = match path {
        Some(path) => {
            let yaml = tokio::fs::read_to_string(path).await?;
            let config = RulesConfig::from_yaml(&yaml)?;
            info!(path = %path.display(), "Loaded extraction rules");
            config
        }
        None => RulesConfig::default(),
    };
    config.compile()
}
