//! Assignment domain model.
//!
//! # Invariants
//! - `(event_id, photographer_id)` is unique in storage.
//! - Assignments are created only by the assignment engine and never
//!   mutated; they disappear only when their event or photographer does.

use crate::model::event::EventId;
use crate::model::photographer::{Photographer, PhotographerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AssignmentId = Uuid;

/// Committed pairing of one photographer to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub event_id: EventId,
    pub photographer_id: PhotographerId,
}

impl Assignment {
    pub fn new(event_id: EventId, photographer_id: PhotographerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            photographer_id,
        }
    }
}

/// Assignment row joined with its photographer, for event detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedPhotographer {
    pub assignment_id: AssignmentId,
    pub photographer: Photographer,
}
