//! The editing session behind the conference editor.
//!
//! An `EditSession` owns exactly one `ConferenceData` value. The form fields
//! and the JSON text are both views of that value:
//!
//! - a form edit writes into the record and regenerates the text
//! - a text edit replaces the record if the text parses, and never rewrites
//!   the text the user is typing
//!
//! Each change flows in one direction only, so neither view can trigger an
//! update of the other in a loop.

use std::time::{Duration, Instant};

use crate::conference::ConferenceData;
use crate::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use crate::form::{ConferenceForm, FormField, apply_field};
use crate::validate::{Validation, Validator};

/// Which view produced the most recent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Load,
    Form,
    Text,
}

#[derive(Debug)]
pub struct EditSession {
    record: ConferenceData,
    /// The event already had conference data when the session was opened
    existing: bool,
    text: String,
    parse_error: Option<String>,
    validation: Validation,
    validator: Validator,
    dirty: bool,
    last_origin: ChangeOrigin,
    pending_text: Debouncer<String>,
}

impl EditSession {
    /// Open a session for an event's conference data, or for an event without
    /// any (`None`, or the provider's empty placeholder).
    pub fn load(record: Option<ConferenceData>) -> Self {
        Self::load_with(record, Validator::default(), DEFAULT_DEBOUNCE)
    }

    pub fn load_with(
        record: Option<ConferenceData>,
        validator: Validator,
        debounce: Duration,
    ) -> Self {
        let record = record.filter(|r| !r.is_empty());
        let existing = record.is_some();
        let record = record.unwrap_or_else(ConferenceData::new_default);

        let mut session = EditSession {
            record,
            existing,
            text: String::new(),
            parse_error: None,
            validation: Validation::default(),
            validator,
            dirty: false,
            last_origin: ChangeOrigin::Load,
            pending_text: Debouncer::new(debounce),
        };
        session.regenerate_text();
        session.revalidate();

        tracing::debug!(existing, "Opened conference edit session");
        session
    }

    pub fn record(&self) -> &ConferenceData {
        &self.record
    }

    pub fn form(&self) -> ConferenceForm {
        ConferenceForm::project(&self.record)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the event had no conference data before this session.
    pub fn is_new(&self) -> bool {
        !self.existing
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_origin(&self) -> ChangeOrigin {
        self.last_origin
    }

    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    pub fn warnings(&self) -> &[String] {
        &self.validation.warnings
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    /// The text parses and nothing is waiting to be reconciled.
    pub fn is_valid(&self) -> bool {
        self.parse_error.is_none() && !self.pending_text.is_pending()
    }

    pub fn is_submittable(&self) -> bool {
        self.is_valid() && self.validation.is_valid()
    }

    /// Why the session can't be submitted, if it can't.
    pub fn error_message(&self) -> Option<String> {
        if let Some(err) = &self.parse_error {
            return Some(err.clone());
        }
        if self.pending_text.is_pending() {
            return Some("Text edit has not been applied yet".to_string());
        }
        self.validation.error_message()
    }

    /// A form input changed. The text view is regenerated from the record.
    pub fn set_field(&mut self, field: FormField, value: &str) {
        // A text edit still waiting in the debouncer is older than this one
        if self.pending_text.flush().is_some() {
            tracing::debug!("Dropped pending text edit superseded by form edit");
        }

        apply_field(&mut self.record, field, value);
        self.dirty = true;
        self.last_origin = ChangeOrigin::Form;
        self.regenerate_text();
        self.revalidate();
    }

    /// The JSON text changed. On success every form field is repopulated from
    /// the parsed record; on failure the record is left as it was and the
    /// session is marked invalid.
    pub fn set_text(&mut self, text: &str) {
        self.pending_text.flush();
        self.text = text.to_string();
        self.dirty = true;
        self.last_origin = ChangeOrigin::Text;

        match ConferenceData::from_json_str(text) {
            Ok(record) => {
                self.record = record;
                self.parse_error = None;
                self.revalidate();
            }
            Err(e) => {
                tracing::debug!(error = %e, "Text edit did not parse");
                self.parse_error = Some(e.to_string());
            }
        }
    }

    /// Debounced variant of `set_text`: the text view updates at once, the
    /// record only after `poll_text`/`settle_text` releases the edit.
    pub fn input_text(&mut self, text: &str, now: Instant) {
        self.text = text.to_string();
        self.dirty = true;
        self.last_origin = ChangeOrigin::Text;
        self.pending_text.push(text.to_string(), now);
    }

    /// Apply the pending text edit if its window has elapsed. Returns whether
    /// anything was applied.
    pub fn poll_text(&mut self, now: Instant) -> bool {
        match self.pending_text.poll(now) {
            Some(text) => {
                self.set_text(&text);
                true
            }
            None => false,
        }
    }

    /// Apply the pending text edit immediately.
    pub fn flush_text(&mut self) -> bool {
        match self.pending_text.flush() {
            Some(text) => {
                self.set_text(&text);
                true
            }
            None => false,
        }
    }

    /// Wait for the debounce window, then apply the pending text edit.
    pub async fn settle_text(&mut self) -> bool {
        match self.pending_text.settle().await {
            Some(text) => {
                self.set_text(&text);
                true
            }
            None => false,
        }
    }

    fn regenerate_text(&mut self) {
        match self.record.to_pretty_json() {
            Ok(text) => {
                self.text = text;
                self.parse_error = None;
            }
            Err(e) => self.parse_error = Some(e.to_string()),
        }
    }

    fn revalidate(&mut self) {
        self.validation = self.validator.validate(&self.form());
    }
}
