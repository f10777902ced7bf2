pub mod auth_init;
pub mod auth_submit;
pub mod delete_conference_data;
pub mod get_conference_data;
pub mod get_event;
pub mod list_calendars;
pub mod list_events;
pub mod update_conference_data;

use anyhow::Result;
use confedit_core::ConfEditError;

/// Calendar and event ids are required for every event-level command.
pub fn require_ids(calendar_id: &str, event_id: &str) -> Result<()> {
    if calendar_id.trim().is_empty() {
        return Err(ConfEditError::Validation("Calendar ID is required".into()).into());
    }
    if event_id.trim().is_empty() {
        return Err(ConfEditError::Validation("Event ID is required".into()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use confedit_core::error::ErrorKind;

    #[test]
    fn blank_ids_are_validation_errors() {
        let err = require_ids(" ", "e1").unwrap_err();
        let core = err.downcast_ref::<ConfEditError>().unwrap();
        assert_eq!(core.kind(), ErrorKind::Validation);

        assert!(require_ids("primary", "").is_err());
        assert!(require_ids("primary", "e1").is_ok());
    }
}
