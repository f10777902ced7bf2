//! Provider subprocess protocol.
//!
//! This module handles communication with external provider binaries
//! (e.g., `confedit-provider-google`) using JSON over stdin/stdout.
//!
//! Each call spawns the provider, writes one request line and reads one
//! response. There is no timeout and no retry: a failed call is reported
//! as is and the caller decides whether to try again.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;

use crate::backend::CalendarBackend;
use crate::conference::ConferenceData;
use crate::error::{ConfEditError, ConfEditResult};
use crate::event::{CalendarSummary, EventRecord, EventSummary};
use crate::payload::{ConferencePatch, EventPatch, PatchOptions};
use crate::protocol::{
    AuthInit, AuthInitResponse, AuthSubmit, Command, DeleteConferenceData, GetConferenceData,
    GetEvent, ListCalendars, ListEvents, ProviderCommand, Request, Response,
    UpdateConferenceData,
};
use crate::window::EventWindow;

pub const DEFAULT_MAX_RESULTS: usize = 50;

#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    account: String,
    max_results: usize,
}

impl Provider {
    pub fn new(name: &str, account: &str) -> Self {
        Provider {
            name: name.to_string(),
            account: account.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    fn binary_path(&self) -> ConfEditResult<std::path::PathBuf> {
        let binary_name = format!("confedit-provider-{}", self.name);
        let binary_path = which::which(&binary_name).map_err(|_| {
            ConfEditError::ProviderNotInstalled(format!(
                "Provider '{}' not found. Install it with:\n  cargo install {}",
                self.name, binary_name
            ))
        })?;
        Ok(binary_path)
    }

    /// Start authentication: the provider returns the consent URL.
    pub async fn auth_init(&self, redirect_uri: &str) -> ConfEditResult<AuthInitResponse> {
        self.call(AuthInit {
            redirect_uri: redirect_uri.to_string(),
        })
        .await
    }

    /// Exchange the authorization code; returns the account identifier.
    pub async fn auth_submit(
        &self,
        code: &str,
        state: &str,
        redirect_uri: &str,
    ) -> ConfEditResult<String> {
        self.call(AuthSubmit {
            code: code.to_string(),
            state: state.to_string(),
            redirect_uri: redirect_uri.to_string(),
        })
        .await
    }

    /// The event's conference data, `None` if it has none.
    pub async fn get_conference_data(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> ConfEditResult<Option<ConferenceData>> {
        let data = self
            .call(GetConferenceData {
                account: self.account.clone(),
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
            })
            .await?;
        Ok(Some(data).filter(|d| !d.is_empty()))
    }

    /// Call a typed provider command and return the result.
    ///
    /// The response type is inferred from the command's associated type,
    /// ensuring compile-time type safety.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> ConfEditResult<C::Response> {
        self.call_raw(C::command(), cmd).await
    }

    /// Low-level call that sends a command with params and deserializes the response.
    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> ConfEditResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| ConfEditError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| ConfEditError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;
        tracing::debug!(provider = %self.name, ?command, "Calling provider");

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                ConfEditError::Provider(format!(
                    "Failed to spawn {}: {}",
                    binary_path.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ConfEditError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(ConfEditError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(ConfEditError::Provider(
                "Provider returned no response".into(),
            ));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| ConfEditError::Provider(format!("Failed to parse response: {}", e)))?;

        response.into_result()
    }
}

#[async_trait]
impl CalendarBackend for Provider {
    async fn list_calendars(&self) -> ConfEditResult<Vec<CalendarSummary>> {
        self.call(ListCalendars {
            account: self.account.clone(),
        })
        .await
    }

    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        window: &EventWindow,
        query: Option<&str>,
    ) -> ConfEditResult<Vec<EventSummary>> {
        self.call(ListEvents {
            account: self.account.clone(),
            calendar_id: calendar_id.to_string(),
            from: window.start_rfc3339(),
            to: window.end_rfc3339(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
            max_results: self.max_results,
        })
        .await
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> ConfEditResult<EventRecord> {
        self.call(GetEvent {
            account: self.account.clone(),
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })
        .await
    }

    async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
        options: PatchOptions,
    ) -> ConfEditResult<EventRecord> {
        match &patch.conference_data {
            ConferencePatch::Replace(data) => {
                self.call(UpdateConferenceData {
                    account: self.account.clone(),
                    calendar_id: calendar_id.to_string(),
                    event_id: event_id.to_string(),
                    conference_data: data.clone(),
                    conference_data_version: options.conference_data_version,
                })
                .await
            }
            ConferencePatch::Clear => {
                self.call(DeleteConferenceData {
                    account: self.account.clone(),
                    calendar_id: calendar_id.to_string(),
                    event_id: event_id.to_string(),
                    conference_data_version: options.conference_data_version,
                })
                .await
            }
        }
    }
}
