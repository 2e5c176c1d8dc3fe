//! Assignment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Expose the storage queries the assignment engine is built on: the
//!   date-keyed busy set, the active-photographer pool and batch insert.
//! - Own the write transaction that makes one assignment run atomic.
//!
//! # Invariants
//! - `in_write_transaction` takes the SQLite write lock before the first
//!   read (`BEGIN IMMEDIATE`), so concurrent runs on the same database are
//!   serialized.
//! - `(event_id, photographer_id)` uniqueness is enforced by storage and
//!   surfaced as `RepoError::DuplicateAssignment`.
//! - Pool listing is deterministic: `id ASC`.

use crate::model::assignment::Assignment;
use crate::model::event::{Event, EventId};
use crate::model::photographer::{Photographer, PhotographerId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::event_repo::{event_has_assignments, find_event, parse_event_row};
use crate::repo::photographer_repo::{parse_photographer_row, PHOTOGRAPHER_SELECT_SQL};
use crate::repo::{date_to_db, is_unique_violation, parse_uuid};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

/// Storage contract for the assignment engine.
pub trait AssignmentRepository {
    /// Runs `op` inside one write transaction.
    ///
    /// Commits when `op` returns `Ok`; rolls back every write made by `op`
    /// when it returns `Err`.
    fn in_write_transaction<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;
    fn find_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn photographer_exists(&self, id: PhotographerId) -> RepoResult<bool>;
    fn event_has_assignments(&self, event_id: EventId) -> RepoResult<bool>;
    /// Photographer ids holding an assignment on any event dated `date`.
    fn busy_photographer_ids_on(&self, date: NaiveDate) -> RepoResult<BTreeSet<PhotographerId>>;
    /// Active photographers whose id is not in `excluded`, ordered by id.
    fn active_photographers_excluding(
        &self,
        excluded: &BTreeSet<PhotographerId>,
    ) -> RepoResult<Vec<Photographer>>;
    /// Inserts one assignment per photographer. Call inside
    /// `in_write_transaction` to get all-or-nothing semantics.
    fn insert_assignments(
        &self,
        event_id: EventId,
        photographer_ids: &[PhotographerId],
    ) -> RepoResult<Vec<Assignment>>;
    /// Distinct events the photographer is assigned to, ordered by
    /// `event_date ASC, id ASC`.
    fn events_for_photographer(&self, id: PhotographerId) -> RepoResult<Vec<Event>>;
    fn list_assignments(&self, event_id: Option<EventId>) -> RepoResult<Vec<Assignment>>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn in_write_transaction<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        // Dropping `tx` on the error path rolls back.
        let value = op(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }

    fn find_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        find_event(self.conn, id)
    }

    fn photographer_exists(&self, id: PhotographerId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM photographers WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn event_has_assignments(&self, event_id: EventId) -> RepoResult<bool> {
        event_has_assignments(self.conn, event_id)
    }

    fn busy_photographer_ids_on(&self, date: NaiveDate) -> RepoResult<BTreeSet<PhotographerId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT a.photographer_id
             FROM assignments a
             INNER JOIN events e ON e.id = a.event_id
             WHERE e.event_date = ?1;",
        )?;
        let mut rows = stmt.query([date_to_db(date)])?;
        let mut busy = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            busy.insert(parse_uuid(&value, "assignments.photographer_id")?);
        }
        Ok(busy)
    }

    fn active_photographers_excluding(
        &self,
        excluded: &BTreeSet<PhotographerId>,
    ) -> RepoResult<Vec<Photographer>> {
        let mut sql = format!("{PHOTOGRAPHER_SELECT_SQL} WHERE is_active = 1");
        let mut bind_values: Vec<Value> = Vec::with_capacity(excluded.len());

        if !excluded.is_empty() {
            let placeholders = vec!["?"; excluded.len()].join(", ");
            sql.push_str(&format!(" AND id NOT IN ({placeholders})"));
            bind_values.extend(excluded.iter().map(|id| Value::Text(id.to_string())));
        }
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pool = Vec::new();
        while let Some(row) = rows.next()? {
            pool.push(parse_photographer_row(row)?);
        }
        Ok(pool)
    }

    fn insert_assignments(
        &self,
        event_id: EventId,
        photographer_ids: &[PhotographerId],
    ) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO assignments (id, event_id, photographer_id) VALUES (?1, ?2, ?3);",
        )?;
        let mut created = Vec::with_capacity(photographer_ids.len());
        for photographer_id in photographer_ids {
            let assignment = Assignment::new(event_id, *photographer_id);
            stmt.execute(params![
                assignment.id.to_string(),
                event_id.to_string(),
                photographer_id.to_string(),
            ])
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::DuplicateAssignment {
                        event_id,
                        photographer_id: *photographer_id,
                    }
                } else {
                    err.into()
                }
            })?;
            created.push(assignment);
        }
        Ok(created)
    }

    fn events_for_photographer(&self, id: PhotographerId) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT
                e.id AS id,
                e.name AS name,
                e.event_date AS event_date,
                e.photographers_required AS photographers_required,
                e.created_at AS created_at
             FROM events e
             INNER JOIN assignments a ON a.event_id = e.id
             WHERE a.photographer_id = ?1
             ORDER BY e.event_date ASC, e.id ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn list_assignments(&self, event_id: Option<EventId>) -> RepoResult<Vec<Assignment>> {
        let mut sql = String::from(
            "SELECT a.id, a.event_id, a.photographer_id
             FROM assignments a
             INNER JOIN events e ON e.id = a.event_id",
        );
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(event_id) = event_id {
            sql.push_str(" WHERE a.event_id = ?");
            bind_values.push(Value::Text(event_id.to_string()));
        }
        sql.push_str(" ORDER BY e.event_date ASC, a.event_id ASC, a.photographer_id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let event_id: String = row.get(1)?;
            let photographer_id: String = row.get(2)?;
            items.push(Assignment {
                id: parse_uuid(&id, "assignments.id")?,
                event_id: parse_uuid(&event_id, "assignments.event_id")?,
                photographer_id: parse_uuid(&photographer_id, "assignments.photographer_id")?,
            });
        }
        Ok(items)
    }
}
