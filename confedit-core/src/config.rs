//! Global confedit configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::error::{ConfEditError, ConfEditResult};
use crate::provider::{DEFAULT_MAX_RESULTS, Provider};
use crate::validate::{DEFAULT_TRUSTED_ICON_DOMAINS, Validator};
use crate::window::DEFAULT_WINDOW_DAYS;

static DEFAULT_PROVIDER: &str = "google";
static DEFAULT_CALENDAR: &str = "primary";

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_calendar() -> String {
    DEFAULT_CALENDAR.to_string()
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_trusted_icon_domains() -> Vec<String> {
    DEFAULT_TRUSTED_ICON_DOMAINS
        .iter()
        .map(|d| d.to_string())
        .collect()
}

/// Global configuration at ~/.config/confedit/config.toml
///
/// Every key can be overridden with a `CONFEDIT_<KEY>` environment variable.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConfeditConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Provider account identifier (e.g., the Google account email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    #[serde(default = "default_calendar")]
    pub default_calendar: String,

    /// How far ahead `events` looks by default
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_trusted_icon_domains")]
    pub trusted_icon_domains: Vec<String>,
}

impl Default for ConfeditConfig {
    fn default() -> Self {
        ConfeditConfig {
            provider: default_provider(),
            account: None,
            default_calendar: default_calendar(),
            window_days: default_window_days(),
            max_results: default_max_results(),
            debounce_ms: default_debounce_ms(),
            trusted_icon_domains: default_trusted_icon_domains(),
        }
    }
}

impl ConfeditConfig {
    pub fn config_path() -> ConfEditResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfEditError::Config("Could not determine config directory".into()))?
            .join("confedit");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/confedit/config.toml, creating a commented default on
    /// first use.
    pub fn load() -> ConfEditResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ConfEditResult<Self> {
        let config: ConfeditConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("CONFEDIT")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("trusted_icon_domains"),
            )
            .build()
            .map_err(|e| ConfEditError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfEditError::Config(e.to_string()))?;

        if config.window_days <= 0 {
            return Err(ConfEditError::Config(format!(
                "window_days must be positive, got {}",
                config.window_days
            )));
        }

        Ok(config)
    }

    /// Save the current config to ~/.config/confedit/config.toml
    pub fn save(&self) -> ConfEditResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> ConfEditResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfEditError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfEditError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| ConfEditError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ConfEditResult<()> {
        let contents = format!(
            "\
# confedit configuration

# Calendar provider (runs confedit-provider-<name>):
# provider = \"{DEFAULT_PROVIDER}\"

# Account to use (set by `confedit auth`):
# account = \"you@example.com\"

# Calendar used when --calendar is not given:
# default_calendar = \"{DEFAULT_CALENDAR}\"

# How many days ahead `confedit events` looks, and how many events it shows:
# window_days = {DEFAULT_WINDOW_DAYS}
# max_results = {DEFAULT_MAX_RESULTS}

# Icon hosts that don't trigger a warning:
# trusted_icon_domains = [\"gstatic.com\", \"googleusercontent.com\", \"google.com\"]
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfEditError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ConfEditError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Remember `account` unless one is already configured.
    /// Returns true if the account was set.
    pub fn set_account_if_unset(&mut self, account: &str) -> bool {
        if self.account.is_some() {
            return false;
        }
        self.account = Some(account.to_string());
        true
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.trusted_icon_domains.iter().cloned())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The configured provider, bound to the configured account.
    pub fn provider(&self) -> ConfEditResult<Provider> {
        let account = self.account.as_deref().ok_or_else(|| {
            ConfEditError::Config(
                "No account configured.\n\n\
                Connect your calendar with:\n  \
                confedit auth"
                    .to_string(),
            )
        })?;

        Ok(Provider::new(&self.provider, account).with_max_results(self.max_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfeditConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.provider, "google");
        assert_eq!(config.default_calendar, "primary");
        assert_eq!(config.window_days, 30);
        assert_eq!(config.max_results, 50);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert!(config.account.is_none());
    }

    #[test]
    fn commented_default_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confedit").join("config.toml");
        ConfeditConfig::create_default_config(&path).unwrap();

        let config = ConfeditConfig::load_from(&path).unwrap();
        assert_eq!(config.trusted_icon_domains, default_trusted_icon_domains());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "account = \"me@example.com\"\nwindow_days = 7\ntrusted_icon_domains = [\"cdn.example\"]\n",
        )
        .unwrap();

        let config = ConfeditConfig::load_from(&path).unwrap();
        assert_eq!(config.account.as_deref(), Some("me@example.com"));
        assert_eq!(config.window_days, 7);
        assert_eq!(config.provider().unwrap().account(), "me@example.com");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ConfeditConfig::default();
        assert!(config.set_account_if_unset("me@example.com"));
        assert!(!config.set_account_if_unset("other@example.com"));
        config.save_to(&path).unwrap();

        let loaded = ConfeditConfig::load_from(&path).unwrap();
        assert_eq!(loaded.account.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn provider_requires_account() {
        let err = ConfeditConfig::default().provider().unwrap_err();
        assert!(matches!(err, ConfEditError::Config(_)));
    }

    #[test]
    fn non_positive_window_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "window_days = 0\n").unwrap();
        assert!(ConfeditConfig::load_from(&path).is_err());
    }
}
