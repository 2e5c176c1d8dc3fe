//! Staffing domain model.
//!
//! # Responsibility
//! - Define the canonical records shared by repositories and services.
//! - Own structural validation for events and photographers.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - Assignments are immutable once committed.

pub mod assignment;
pub mod event;
pub mod photographer;
