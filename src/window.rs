//! Event and estimation window handling

use crate::error::{EventStudyError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Closed date interval `[start, end]` identifying the period under study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl EventWindow {
    /// Create a new event window. `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(EventStudyError::Validation(format!(
                "Event window start ({}) is after its end ({})",
                start, end
            )));
        }

        Ok(Self { start, end })
    }

    /// Create an event window from `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    /// First day of the event window
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the event window
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Bounds of the estimation window for a given lookback: the closed
    /// interval from `lookback_days` before the event start through the
    /// event start day itself.
    pub fn estimation_bounds(&self, lookback_days: u32) -> (NaiveDate, NaiveDate) {
        let start = self.start - Duration::days(i64::from(lookback_days));
        (start, self.start)
    }
}

/// Parse a `YYYY-MM-DD` date string.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        EventStudyError::Input(format!("Cannot parse '{}' as a YYYY-MM-DD date: {}", raw, e))
    })
}
