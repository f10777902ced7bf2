//! Complete OAuth authentication - exchanges the code for tokens.

use anyhow::{Context, Result};
use confedit_core::protocol::AuthSubmit;
use google_calendar::Client;
use google_calendar::types::MinAccessRole;

use crate::app_config::AppConfig;
use crate::session::{Session, SessionData};

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: AuthSubmit = serde_json::from_value(params)?;

    let app_config = AppConfig::load()?;

    let mut client = Client::new(
        app_config.client_id.clone(),
        app_config.client_secret.clone(),
        cmd.redirect_uri.clone(),
        String::new(),
        String::new(),
    );

    let tokens = client
        .get_access_token(&cmd.code, &cmd.state)
        .await
        .context("Failed to exchange authorization code for tokens")?;

    let session_data: SessionData = (&tokens).into();

    let client = Client::new(
        app_config.client_id,
        app_config.client_secret,
        cmd.redirect_uri,
        tokens.access_token.clone(),
        tokens.refresh_token.clone(),
    );

    // The primary calendar's summary is the account's email address
    let calendars = client
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
        .context("Failed to fetch calendars")?
        .body;

    let account_email = calendars
        .iter()
        .find(|cal| cal.primary)
        .map(|cal| cal.summary.clone())
        .ok_or_else(|| anyhow::anyhow!("No primary calendar found"))?;

    Session::new(&account_email, session_data).save()?;
    tracing::info!(account = %account_email, "Saved Google session");

    Ok(serde_json::to_value(account_email)?)
}
