//! OAuth client credentials for the Google provider.
//!
//! User-provided, stored at:
//!   ~/.config/confedit/providers/google/app_config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("confedit")
        .join("providers")
        .join("google"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl AppConfig {
    fn path() -> Result<PathBuf> {
        Ok(base_dir()?.join("app_config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            anyhow::bail!(
                "Google credentials not found.\n\n\
                Create {} with:\n\n\
                client_id = \"your-client-id.apps.googleusercontent.com\"\n\
                client_secret = \"your-client-secret\"\n\n\
                The Google Calendar API must be enabled for the project:\n\
                https://console.developers.google.com/apis/api/calendar-json.googleapis.com\n\n\
                See https://console.cloud.google.com/apis/credentials for setup.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            anyhow::bail!("client_id and client_secret must not be empty");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_credentials() {
        let config = AppConfig::parse(
            "client_id = \"id.apps.googleusercontent.com\"\nclient_secret = \"shh\"\n",
        )
        .unwrap();
        assert_eq!(config.client_id, "id.apps.googleusercontent.com");
    }

    #[test]
    fn rejects_empty_secret() {
        assert!(AppConfig::parse("client_id = \"id\"\nclient_secret = \"\"\n").is_err());
    }
}
