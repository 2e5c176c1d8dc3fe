//! Event use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list/delete entry points for events.
//! - Build the nested event detail read model.
//!
//! # Invariants
//! - Date and headcount checks here are a first-pass filter for callers;
//!   the assignment engine re-checks both before staffing.
//! - Deleting an event removes its assignments.

use crate::model::assignment::AssignedPhotographer;
use crate::model::event::{Event, EventId, EventValidationError};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::event_repo::{EventListQuery, EventRepository};
use chrono::{Local, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for event use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    Validation(EventValidationError),
    DateInPast {
        event_date: NaiveDate,
        today: NaiveDate,
    },
    InvalidRequirement {
        required: i64,
    },
    EventNotFound(EventId),
    /// Date change requested on an event that already has assignments.
    AlreadyAssigned(EventId),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DateInPast { event_date, today } => {
                write!(f, "event date {event_date} cannot be in the past (today is {today})")
            }
            Self::InvalidRequirement { required } => write!(
                f,
                "photographers_required must be greater than 0, got {required}"
            ),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::AlreadyAssigned(id) => write!(
                f,
                "event {id} already has assignments; its date cannot change"
            ),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent event state: {details}"),
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EventServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EventNotFound(id) => Self::EventNotFound(id),
            RepoError::EventAlreadyAssigned(id) => Self::AlreadyAssigned(id),
            RepoError::EventValidation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Input for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub event_date: NaiveDate,
    pub photographers_required: i64,
}

/// Event together with its assigned photographers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub assignments: Vec<AssignedPhotographer>,
}

/// Event service facade over repository implementations.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an event, rejecting past dates relative to the local day.
    pub fn create_event(&self, request: &NewEvent) -> Result<Event, EventServiceError> {
        self.create_event_as_of(request, Local::now().date_naive())
    }

    /// Creates an event with `today` as reference day for the date check.
    pub fn create_event_as_of(
        &self,
        request: &NewEvent,
        today: NaiveDate,
    ) -> Result<Event, EventServiceError> {
        check_schedulable(request.event_date, request.photographers_required, today)?;

        let event = Event::new(
            request.name.trim(),
            request.event_date,
            request.photographers_required,
        );
        let event_id = self.repo.create_event(&event)?;
        info!(
            "event=event_create module=service status=ok event_id={} required={}",
            event_id, event.photographers_required
        );

        self.repo
            .get_event(event_id)?
            .ok_or(EventServiceError::InconsistentState(
                "created event not found in read-back",
            ))
    }

    /// Replaces name, date and headcount of an existing event.
    ///
    /// Moving an event that already has assignments to another date fails
    /// with `AlreadyAssigned` and leaves the row unchanged.
    pub fn update_event_as_of(
        &self,
        event: &Event,
        today: NaiveDate,
    ) -> Result<Event, EventServiceError> {
        check_schedulable(event.event_date, event.photographers_required, today)?;
        self.repo.update_event(event)?;
        self.repo
            .get_event(event.id)?
            .ok_or(EventServiceError::InconsistentState(
                "updated event not found in read-back",
            ))
    }

    /// Same as `update_event_as_of` against the local day.
    pub fn update_event(&self, event: &Event) -> Result<Event, EventServiceError> {
        self.update_event_as_of(event, Local::now().date_naive())
    }

    pub fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.repo.get_event(id)
    }

    pub fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<Event>> {
        self.repo.list_events(query)
    }

    /// Loads one event with its assigned photographers.
    pub fn event_detail(&self, id: EventId) -> Result<EventDetail, EventServiceError> {
        let event = self
            .repo
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))?;
        let assignments = self.repo.assigned_photographers(id)?;
        Ok(EventDetail { event, assignments })
    }

    /// Deletes an event and, through cascade, its assignments.
    pub fn delete_event(&self, id: EventId) -> Result<(), EventServiceError> {
        self.repo.delete_event(id)?;
        info!("event=event_delete module=service status=ok event_id={id}");
        Ok(())
    }
}

fn check_schedulable(
    event_date: NaiveDate,
    required: i64,
    today: NaiveDate,
) -> Result<(), EventServiceError> {
    if event_date < today {
        return Err(EventServiceError::DateInPast { event_date, today });
    }
    if required <= 0 {
        return Err(EventServiceError::InvalidRequirement { required });
    }
    Ok(())
}
