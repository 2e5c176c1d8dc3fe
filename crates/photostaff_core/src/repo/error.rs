//! Repository error type shared by all staffing repositories.

use crate::db::DbError;
use crate::model::event::{EventId, EventValidationError};
use crate::model::photographer::{PhotographerId, PhotographerValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for staffing persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    EventValidation(EventValidationError),
    PhotographerValidation(PhotographerValidationError),
    Db(DbError),
    EventNotFound(EventId),
    PhotographerNotFound(PhotographerId),
    /// Event date cannot move once photographers are assigned.
    EventAlreadyAssigned(EventId),
    /// Another photographer already uses this email (case-insensitive).
    DuplicateEmail(String),
    /// Storage backstop for the `(event, photographer)` uniqueness rule.
    DuplicateAssignment {
        event_id: EventId,
        photographer_id: PhotographerId,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventValidation(err) => write!(f, "{err}"),
            Self::PhotographerValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::PhotographerNotFound(id) => write!(f, "photographer not found: {id}"),
            Self::EventAlreadyAssigned(id) => write!(
                f,
                "event {id} already has assignments; its date cannot change"
            ),
            Self::DuplicateEmail(email) => {
                write!(f, "photographer email already registered: {email}")
            }
            Self::DuplicateAssignment {
                event_id,
                photographer_id,
            } => write!(
                f,
                "photographer {photographer_id} is already assigned to event {event_id}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EventValidation(err) => Some(err),
            Self::PhotographerValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::EventNotFound(_)
            | Self::PhotographerNotFound(_)
            | Self::EventAlreadyAssigned(_)
            | Self::DuplicateEmail(_)
            | Self::DuplicateAssignment { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::EventValidation(value)
    }
}

impl From<PhotographerValidationError> for RepoError {
    fn from(value: PhotographerValidationError) -> Self {
        Self::PhotographerValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
