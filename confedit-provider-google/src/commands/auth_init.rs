//! Initialize OAuth authentication - returns the authorization URL.

use anyhow::Result;
use confedit_core::protocol::{AuthInit, AuthInitResponse};
use google_calendar::Client;
use url::Url;

use crate::app_config::AppConfig;

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar.calendarlist.readonly",
    "https://www.googleapis.com/auth/calendar.events",
];

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: AuthInit = serde_json::from_value(params)?;

    let app_config = AppConfig::load()?;

    let client = Client::new(
        app_config.client_id,
        app_config.client_secret,
        cmd.redirect_uri,
        String::new(),
        String::new(),
    );

    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();

    // The library generates the URL with its own state parameter
    let authorization_url = client.user_consent_url(&scopes);
    let state = state_param(&authorization_url)?;

    let response = AuthInitResponse {
        authorization_url,
        state,
        scopes,
    };
    Ok(serde_json::to_value(response)?)
}

fn state_param(authorization_url: &str) -> Result<String> {
    Url::parse(authorization_url)?
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| anyhow::anyhow!("No state parameter in authorization URL"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_state() {
        let url = "https://accounts.google.com/o/oauth2/v2/auth?client_id=x&state=abc123&scope=s";
        assert_eq!(state_param(url).unwrap(), "abc123");
        assert!(state_param("https://accounts.google.com/o/oauth2/v2/auth").is_err());
    }
}
