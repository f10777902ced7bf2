use std::collections::HashMap;

use anyhow::{Context as _, Result};
use confedit_core::backend::CalendarBackend;
use confedit_core::config::ConfeditConfig;
use confedit_core::provider::Provider;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::utils::tui;

const DEFAULT_REDIRECT_PORT: u16 = 8085;

pub async fn run() -> Result<()> {
    let mut config = ConfeditConfig::load()?;
    let port = DEFAULT_REDIRECT_PORT;
    let redirect_uri = format!("http://localhost:{}/callback", port);

    // No account yet, the provider only needs to know which app to authorize
    let provider = Provider::new(&config.provider, "");

    println!("Authenticating with {}...\n", config.provider);

    let oauth = provider.auth_init(&redirect_uri).await?;

    println!("Open this URL in your browser to authenticate:\n");
    println!("{}\n", oauth.authorization_url);

    if open::that(&oauth.authorization_url).is_err() {
        println!("(Could not open browser automatically, please copy the URL above)");
    }

    let params = wait_for_callback(port).await?;

    let code = params
        .get("code")
        .ok_or_else(|| anyhow::anyhow!("No code in callback"))?;
    let state = params
        .get("state")
        .ok_or_else(|| anyhow::anyhow!("No state in callback"))?;

    if state != &oauth.state {
        anyhow::bail!("OAuth state mismatch - possible CSRF attack");
    }

    let account = tui::with_spinner(
        "Exchanging authorization code...",
        provider.auth_submit(code, state, &redirect_uri),
    )
    .await?;

    println!("Authenticated as: {}\n", account.bold());

    if config.set_account_if_unset(&account) {
        config.save()?;
        println!("Saved account to {}", ConfeditConfig::config_path()?.display());
    } else if config.account.as_deref() != Some(account.as_str()) {
        println!(
            "{}",
            format!(
                "Config already uses account {}; edit `account` in the config to switch.",
                config.account.as_deref().unwrap_or_default()
            )
            .dimmed()
        );
    }

    let calendars = tui::with_spinner(
        "Fetching calendars...",
        Provider::new(&config.provider, &account).list_calendars(),
    )
    .await?;
    println!("Found {} writable calendar(s).", calendars.len());
    println!("\nRun `confedit events` to pick an event.");

    Ok(())
}

/// Wait for an HTTP callback on localhost and return all query parameters.
async fn wait_for_callback(port: u16) -> Result<HashMap<String, String>> {
    let address = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&address)
        .await
        .context("Failed to bind OAuth callback listener")?;

    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    let params = callback_params(&request_line)?;

    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    Ok(params)
}

/// Query parameters of an HTTP request line like `GET /callback?code=... HTTP/1.1`.
fn callback_params(request_line: &str) -> Result<HashMap<String, String>> {
    let path = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = url::Url::parse(&format!("http://localhost{}", path))?;
    Ok(url.query_pairs().into_owned().collect())
}
