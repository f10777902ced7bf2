//! Core types for confedit.
//!
//! This crate holds everything both the CLI and the provider binaries share:
//! - `conference` and `event` for the provider-neutral data model
//! - `session` for the form/JSON synchronizer that backs the editor
//! - `patch_client` for committing or clearing conference data
//! - `protocol` and `provider` for the CLI-provider communication protocol

pub mod backend;
pub mod conference;
pub mod config;
pub mod debounce;
pub mod error;
pub mod event;
pub mod form;
pub mod memory;
pub mod patch_client;
pub mod payload;
pub mod protocol;
pub mod provider;
pub mod session;
pub mod validate;
pub mod window;

pub use backend::CalendarBackend;
pub use conference::{ConferenceData, ConferenceSolution, EntryPoint, EntryPointType};
pub use error::{ConfEditError, ConfEditResult};
pub use event::{CalendarSummary, EventRecord, EventSummary};
pub use form::{ConferenceForm, FormField};
pub use patch_client::ConferencePatchClient;
pub use session::EditSession;
