//! Core domain logic for photography event staffing.
//! This crate is the single source of truth for staffing invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::assignment::{AssignedPhotographer, Assignment, AssignmentId};
pub use model::event::{Event, EventId, EventValidationError};
pub use model::photographer::{Photographer, PhotographerId, PhotographerValidationError};
pub use repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::event_repo::{EventListQuery, EventRepository, SqliteEventRepository};
pub use repo::photographer_repo::{
    PhotographerListQuery, PhotographerRepository, SqlitePhotographerRepository,
};
pub use service::assignment_service::{AssignmentError, AssignmentOutcome, AssignmentService};
pub use service::event_service::{EventDetail, EventService, EventServiceError, NewEvent};
pub use service::photographer_service::{PhotographerService, PhotographerServiceError};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
