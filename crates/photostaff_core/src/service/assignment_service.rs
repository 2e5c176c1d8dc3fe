//! Assignment engine: staffs events with available photographers.
//!
//! # Responsibility
//! - Decide which photographers are eligible for an event and commit the
//!   selection as one batch.
//! - Answer which events a photographer is booked on.
//!
//! # Invariants
//! - Preconditions are checked in a fixed order; the first failure is
//!   reported and nothing is written.
//! - A photographer holds at most one assignment per calendar date.
//! - Selection takes the first `photographers_required` eligible
//!   photographers by ascending id.
//! - An event is assigned at most once (`Unassigned -> Assigned` is
//!   terminal).

use crate::model::assignment::Assignment;
use crate::model::event::{Event, EventId};
use crate::model::photographer::{Photographer, PhotographerId};
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::error::RepoError;
use chrono::{Local, NaiveDate};
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure outcomes of the assignment engine.
#[derive(Debug)]
pub enum AssignmentError {
    /// Event date is before the reference day.
    InvalidDate {
        event_date: NaiveDate,
        today: NaiveDate,
    },
    /// Event asks for zero or a negative number of photographers.
    InvalidRequirement { required: i64 },
    /// Event already has assignments.
    AlreadyAssigned(EventId),
    /// Fewer eligible photographers than the event requires.
    InsufficientAvailability { required: i64, available: usize },
    EventNotFound(EventId),
    PhotographerNotFound(PhotographerId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl AssignmentError {
    /// Stable machine-readable code for logs and transport mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "invalid_date",
            Self::InvalidRequirement { .. } => "invalid_requirement",
            Self::AlreadyAssigned(_) => "already_assigned",
            Self::InsufficientAvailability { .. } => "insufficient_availability",
            Self::EventNotFound(_) => "event_not_found",
            Self::PhotographerNotFound(_) => "photographer_not_found",
            Self::Repo(_) => "storage_error",
        }
    }

    /// Whether this is a domain rejection rather than a storage failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl Display for AssignmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { event_date, today } => {
                write!(f, "event date {event_date} is in the past (today is {today})")
            }
            Self::InvalidRequirement { required } => write!(
                f,
                "photographers_required must be greater than 0, got {required}"
            ),
            Self::AlreadyAssigned(id) => {
                write!(f, "photographers already assigned to event {id}")
            }
            Self::InsufficientAvailability {
                required,
                available,
            } => write!(
                f,
                "not enough photographers available: required {required}, available {available}"
            ),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::PhotographerNotFound(id) => write!(f, "photographer not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssignmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AssignmentError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EventNotFound(id) => Self::EventNotFound(id),
            RepoError::PhotographerNotFound(id) => Self::PhotographerNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Successful assignment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentOutcome {
    pub event_id: EventId,
    /// Selected photographers, in selection order.
    pub assigned_photographers: Vec<Photographer>,
    /// Committed rows, parallel to `assigned_photographers`.
    pub assignments: Vec<Assignment>,
}

/// Assignment engine over a repository implementation.
pub struct AssignmentService<R: AssignmentRepository> {
    repo: R,
}

impl<R: AssignmentRepository> AssignmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Assigns photographers to `event_id`, judging dates against the local
    /// calendar day at call time.
    pub fn assign(&self, event_id: EventId) -> Result<AssignmentOutcome, AssignmentError> {
        self.assign_on(event_id, Local::now().date_naive())
    }

    /// Assigns photographers to `event_id` with `today` as reference day.
    ///
    /// # Contract
    /// - Checks run in order: event exists, date not before `today`,
    ///   `photographers_required > 0`, no existing assignments, enough
    ///   eligible photographers.
    /// - All checks and the batch insert share one write transaction; on any
    ///   error storage is left unchanged.
    pub fn assign_on(
        &self,
        event_id: EventId,
        today: NaiveDate,
    ) -> Result<AssignmentOutcome, AssignmentError> {
        let started_at = Instant::now();
        let result = self
            .repo
            .in_write_transaction(|repo| assign_in_tx(repo, event_id, today));

        match &result {
            Ok(outcome) => info!(
                "event=assign_photographers module=service status=ok event_id={} assigned={} duration_ms={}",
                event_id,
                outcome.assignments.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) if err.is_rejection() => info!(
                "event=assign_photographers module=service status=rejected event_id={} reason={}{} duration_ms={}",
                event_id,
                err.code(),
                rejection_fields(err),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=assign_photographers module=service status=error event_id={} duration_ms={} error={}",
                event_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }

    /// Returns the events `photographer_id` is booked on, by date.
    pub fn schedule(&self, photographer_id: PhotographerId) -> Result<Vec<Event>, AssignmentError> {
        if !self.repo.photographer_exists(photographer_id)? {
            info!(
                "event=schedule module=service status=rejected photographer_id={} reason=photographer_not_found",
                photographer_id
            );
            return Err(AssignmentError::PhotographerNotFound(photographer_id));
        }

        let events = self.repo.events_for_photographer(photographer_id)?;
        info!(
            "event=schedule module=service status=ok photographer_id={} events={}",
            photographer_id,
            events.len()
        );
        Ok(events)
    }

    /// Lists committed assignments, optionally for one event.
    pub fn list_assignments(
        &self,
        event_id: Option<EventId>,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        if let Some(event_id) = event_id {
            self.repo
                .find_event(event_id)?
                .ok_or(AssignmentError::EventNotFound(event_id))?;
        }
        self.repo.list_assignments(event_id).map_err(Into::into)
    }
}

fn assign_in_tx<R: AssignmentRepository>(
    repo: &R,
    event_id: EventId,
    today: NaiveDate,
) -> Result<AssignmentOutcome, AssignmentError> {
    let event = repo
        .find_event(event_id)?
        .ok_or(AssignmentError::EventNotFound(event_id))?;

    if event.is_past(today) {
        return Err(AssignmentError::InvalidDate {
            event_date: event.event_date,
            today,
        });
    }

    let required = event.photographers_required;
    if required <= 0 {
        return Err(AssignmentError::InvalidRequirement { required });
    }

    if repo.event_has_assignments(event_id)? {
        return Err(AssignmentError::AlreadyAssigned(event_id));
    }

    let busy = repo.busy_photographer_ids_on(event.event_date)?;
    let eligible = repo.active_photographers_excluding(&busy)?;
    let available = eligible.len();
    let wanted = usize::try_from(required).unwrap_or(usize::MAX);
    if available < wanted {
        return Err(AssignmentError::InsufficientAvailability {
            required,
            available,
        });
    }

    let selected = select_photographers(eligible, wanted);
    let ids = selected.iter().map(|p| p.id).collect::<Vec<_>>();
    let assignments = repo.insert_assignments(event_id, &ids)?;

    Ok(AssignmentOutcome {
        event_id,
        assigned_photographers: selected,
        assignments,
    })
}

/// Extra `key=value` pairs for a rejected run's log line.
fn rejection_fields(err: &AssignmentError) -> String {
    match err {
        AssignmentError::InsufficientAvailability {
            required,
            available,
        } => format!(" required={required} available={available}"),
        AssignmentError::InvalidRequirement { required } => format!(" required={required}"),
        _ => String::new(),
    }
}

/// Picks `count` photographers by ascending id, independent of the order
/// the pool was loaded in.
pub fn select_photographers(mut eligible: Vec<Photographer>, count: usize) -> Vec<Photographer> {
    eligible.sort_by_key(|photographer| photographer.id);
    eligible.truncate(count);
    eligible
}

#[cfg(test)]
mod tests {
    use super::{rejection_fields, select_photographers, AssignmentError};
    use crate::model::photographer::Photographer;
    use crate::repo::error::RepoError;
    use uuid::Uuid;

    fn photographer(id: &str) -> Photographer {
        let mut photographer = Photographer::new("P", format!("{id}@example.com"), "");
        photographer.id = Uuid::parse_str(id).unwrap();
        photographer
    }

    #[test]
    fn selection_orders_by_ascending_id() {
        let pool = vec![
            photographer("cccccccc-0000-4000-8000-000000000000"),
            photographer("aaaaaaaa-0000-4000-8000-000000000000"),
            photographer("bbbbbbbb-0000-4000-8000-000000000000"),
        ];

        let selected = select_photographers(pool, 2);
        let ids = selected
            .iter()
            .map(|p| p.id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            [
                "aaaaaaaa-0000-4000-8000-000000000000",
                "bbbbbbbb-0000-4000-8000-000000000000"
            ]
        );
    }

    #[test]
    fn insufficient_availability_log_fields_carry_counts() {
        let err = AssignmentError::InsufficientAvailability {
            required: 3,
            available: 1,
        };
        assert_eq!(rejection_fields(&err), " required=3 available=1");
        assert_eq!(
            rejection_fields(&AssignmentError::InvalidRequirement { required: 0 }),
            " required=0"
        );
        assert!(rejection_fields(&AssignmentError::AlreadyAssigned(Uuid::nil())).is_empty());
    }

    #[test]
    fn not_found_repo_errors_become_domain_errors() {
        let id = Uuid::new_v4();
        let err = AssignmentError::from(RepoError::EventNotFound(id));
        assert!(matches!(err, AssignmentError::EventNotFound(found) if found == id));
        assert!(err.is_rejection());

        let storage = AssignmentError::from(RepoError::InvalidData("x".to_string()));
        assert_eq!(storage.code(), "storage_error");
        assert!(!storage.is_rejection());
    }
}
