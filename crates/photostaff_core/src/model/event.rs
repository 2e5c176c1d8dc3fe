//! Event domain model.
//!
//! # Responsibility
//! - Define the event record that photographers are staffed onto.
//! - Provide structural validation shared by all write paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `name` is non-blank and at most `EVENT_NAME_MAX_CHARS` characters.
//! - `photographers_required` is only checked for positivity when staffing
//!   rules apply, not on every structural write.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an event.
pub type EventId = Uuid;

/// Maximum length of an event name, in characters.
pub const EVENT_NAME_MAX_CHARS: usize = 255;

/// Single-day photography event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    /// Calendar day of the event, serialized as `YYYY-MM-DD`.
    pub event_date: NaiveDate,
    /// Number of photographers the event needs.
    pub photographers_required: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Structural validation failures for `Event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventValidationError {
    NilId,
    BlankName,
    NameTooLong { max: usize, actual: usize },
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "event id must not be nil"),
            Self::BlankName => write!(f, "event name must not be blank"),
            Self::NameTooLong { max, actual } => {
                write!(f, "event name has {actual} characters; at most {max} allowed")
            }
        }
    }
}

impl Error for EventValidationError {}

impl Event {
    /// Creates a new event with a generated id and the current timestamp.
    pub fn new(name: impl Into<String>, event_date: NaiveDate, photographers_required: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            event_date,
            photographers_required,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Checks structural invariants required before persistence.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.is_nil() {
            return Err(EventValidationError::NilId);
        }
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(EventValidationError::BlankName);
        }
        let actual = trimmed.chars().count();
        if actual > EVENT_NAME_MAX_CHARS {
            return Err(EventValidationError::NameTooLong {
                max: EVENT_NAME_MAX_CHARS,
                actual,
            });
        }
        Ok(())
    }

    /// Returns whether the event day is strictly before `today`.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.event_date < today
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, EventValidationError, EVENT_NAME_MAX_CHARS};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validate_accepts_regular_event() {
        let event = Event::new("Wedding", day(2030, 6, 1), 2);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_and_long_names() {
        let blank = Event::new("   ", day(2030, 6, 1), 2);
        assert_eq!(blank.validate(), Err(EventValidationError::BlankName));

        let long = Event::new("x".repeat(EVENT_NAME_MAX_CHARS + 1), day(2030, 6, 1), 2);
        assert!(matches!(
            long.validate(),
            Err(EventValidationError::NameTooLong { actual, .. }) if actual == EVENT_NAME_MAX_CHARS + 1
        ));
    }

    #[test]
    fn validate_rejects_nil_id() {
        let mut event = Event::new("Gala", day(2030, 6, 1), 1);
        event.id = Uuid::nil();
        assert_eq!(event.validate(), Err(EventValidationError::NilId));
    }

    #[test]
    fn is_past_is_strict() {
        let event = Event::new("Gala", day(2030, 6, 1), 1);
        assert!(!event.is_past(day(2030, 6, 1)));
        assert!(event.is_past(day(2030, 6, 2)));
    }
}
