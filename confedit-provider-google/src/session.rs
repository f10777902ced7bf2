//! Creates a valid Google session (access token) that we can use to call the gcal API

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::app_config::{AppConfig, base_dir};

/// Refresh a little before the token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

pub struct Session {
    account: String,
    data: SessionData,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        let expires_at = Utc::now() + Duration::seconds(tokens.expires_in);

        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at,
        }
    }
}

impl Session {
    fn path_for_account(account: &str) -> Result<PathBuf> {
        let account_slug = account.replace(['/', '\\', ':'], "_");

        Ok(base_dir()?
            .join("session")
            .join(format!("{}.toml", account_slug)))
    }

    fn path(&self) -> Result<PathBuf> {
        Self::path_for_account(&self.account)
    }

    pub fn new(account: &str, data: SessionData) -> Self {
        Session {
            account: account.to_string(),
            data,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.data.access_token
    }

    pub fn client(&self) -> Result<Client> {
        let app_config = AppConfig::load()?;

        Ok(Client::new(
            app_config.client_id,
            app_config.client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        ))
    }

    // Load a session and refresh it if expired:
    pub async fn load_valid(account: &str) -> Result<Self> {
        let mut session = Self::load(account)?;

        if session.is_expired() {
            tracing::debug!(account, "Refreshing expired Google session");
            session.refresh().await?;
        }

        Ok(session)
    }

    fn load(account: &str) -> Result<Self> {
        let path = Self::path_for_account(account)?;

        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session for {} not found!\n\
                Run `confedit auth` first.",
                account
            );
        }

        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Failed to read Google OAuth session from {}",
                path.display()
            )
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse Google OAuth session from {}",
                path.display()
            )
        })?;

        Ok(Session::new(account, data))
    }

    pub fn save(&self) -> Result<()> {
        let contents =
            toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        let path = self.path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.data.expires_at
    }

    async fn refresh(&mut self) -> Result<()> {
        let client = self.client()?;

        let mut tokens = client
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()?;

        Ok(())
    }
}
