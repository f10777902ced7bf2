//! confedit-provider-google - Google Calendar provider for confedit
//!
//! This binary implements the confedit provider protocol, communicating
//! with confedit via JSON over stdin/stdout.
//!
//! The provider manages its own credentials and tokens:
//!   ~/.config/confedit/providers/google/app_config.toml
//!   ~/.config/confedit/providers/google/session/{account}.toml

mod app_config;
mod commands;
mod convert;
mod events_api;
mod session;

use confedit_core::ConfEditError;
use confedit_core::error::ErrorKind;
use confedit_core::protocol::{Command, Request, Response};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_logging();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::<()>::error(
                &format!("Failed to parse request: {}", e),
                ErrorKind::Provider,
            ),
        };

        if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
            tracing::error!("Failed to write response: {}", e);
            break;
        }
    }
}

/// Logs go to stderr; stdout is reserved for protocol responses.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("CONFEDIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

async fn handle_request(request: Request) -> String {
    let command = request.command;
    let params = request.params;

    let result = match command {
        Command::AuthInit => commands::auth_init::handle(params).await,
        Command::AuthSubmit => commands::auth_submit::handle(params).await,
        Command::ListCalendars => commands::list_calendars::handle(params).await,
        Command::ListEvents => commands::list_events::handle(params).await,
        Command::GetEvent => commands::get_event::handle(params).await,
        Command::GetConferenceData => commands::get_conference_data::handle(params).await,
        Command::UpdateConferenceData => commands::update_conference_data::handle(params).await,
        Command::DeleteConferenceData => commands::delete_conference_data::handle(params).await,
    };

    match result {
        Ok(data) => Response::success(data),
        Err(e) => {
            tracing::warn!(?command, "{:#}", e);
            let message = match e.downcast_ref::<ConfEditError>() {
                // Sent bare so the caller doesn't print the category twice
                Some(core) => core.message(),
                None => format!("{:#}", e),
            };
            Response::<()>::error(&message, error_kind(&e))
        }
    }
}

/// Typed core errors keep their category across the protocol; anything else
/// is a provider error.
fn error_kind(error: &anyhow::Error) -> ErrorKind {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ConfEditError>())
        .map(ConfEditError::kind)
        .unwrap_or_default()
}
