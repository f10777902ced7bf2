//! Time window for listing upcoming events.

use chrono::{DateTime, Duration, NaiveDate, Utc};

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventWindow {
    /// Parse optional YYYY-MM-DD bounds.
    /// - `from` defaults to now
    /// - `to` defaults to `days` after `from`
    pub fn from_args(from: Option<&str>, to: Option<&str>, days: i64) -> Result<Self, String> {
        let start = match from {
            Some(s) => parse_date_start(s)?,
            None => Utc::now(),
        };

        let end = match to {
            Some(s) => parse_date_end(s)?,
            None => start + Duration::days(days),
        };

        if end <= start {
            return Err(format!(
                "End of window ({}) must be after its start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            ));
        }

        Ok(EventWindow { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }
}

/// Parse YYYY-MM-DD as start of day in UTC
fn parse_date_start(s: &str) -> Result<DateTime<Utc>, String> {
    let date = parse_date(s)?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Parse YYYY-MM-DD as end of day in UTC
fn parse_date_end(s: &str) -> Result<DateTime<Utc>, String> {
    let date = parse_date(s)?;
    Ok((date + Duration::days(1)).and_time(chrono::NaiveTime::MIN).and_utc())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}
