//! Event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `events` table.
//! - Provide the nested event detail read (event + assigned photographers).
//!
//! # Invariants
//! - Write paths must call `Event::validate()` before SQL mutations.
//! - Listing is deterministic: `event_date ASC, id ASC`.
//! - Deleting an event cascades to its assignments.
//! - The date of an event with assignments is frozen; the check and the
//!   write share one immediate transaction.

use crate::model::assignment::AssignedPhotographer;
use crate::model::event::{Event, EventId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::photographer_repo::parse_photographer_row;
use crate::repo::{date_to_db, parse_date, parse_uuid};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

pub(crate) const EVENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    event_date,
    photographers_required,
    created_at
FROM events";

/// Query options for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventListQuery {
    /// Inclusive lower bound on `event_date`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `event_date`.
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for event records.
pub trait EventRepository {
    fn create_event(&self, event: &Event) -> RepoResult<EventId>;
    /// Rewrites name, date and headcount. Fails with
    /// `RepoError::EventAlreadyAssigned` when the date changes on an event
    /// that has assignments.
    fn update_event(&self, event: &Event) -> RepoResult<()>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<Event>>;
    /// Hard-deletes one event together with its assignments.
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
    /// Photographers assigned to the event, ordered by photographer id.
    fn assigned_photographers(&self, id: EventId) -> RepoResult<Vec<AssignedPhotographer>>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<EventId> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO events (
                id,
                name,
                event_date,
                photographers_required,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                event.id.to_string(),
                event.name.trim(),
                date_to_db(event.event_date),
                event.photographers_required,
                event.created_at,
            ],
        )?;

        Ok(event.id)
    }

    fn update_event(&self, event: &Event) -> RepoResult<()> {
        event.validate()?;

        // Write lock held across the check and the UPDATE.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current =
            find_event(self.conn, event.id)?.ok_or(RepoError::EventNotFound(event.id))?;
        if current.event_date != event.event_date && event_has_assignments(self.conn, event.id)? {
            return Err(RepoError::EventAlreadyAssigned(event.id));
        }

        self.conn.execute(
            "UPDATE events
             SET
                name = ?1,
                event_date = ?2,
                photographers_required = ?3
             WHERE id = ?4;",
            params![
                event.name.trim(),
                date_to_db(event.event_date),
                event.photographers_required,
                event.id.to_string(),
            ],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        find_event(self.conn, id)
    }

    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<Event>> {
        let mut sql = format!("{EVENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(from) = query.from {
            sql.push_str(" AND event_date >= ?");
            bind_values.push(Value::Text(date_to_db(from)));
        }
        if let Some(to) = query.to {
            sql.push_str(" AND event_date <= ?");
            bind_values.push(Value::Text(date_to_db(to)));
        }

        sql.push_str(" ORDER BY event_date ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }

        Ok(events)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::EventNotFound(id));
        }
        Ok(())
    }

    fn assigned_photographers(&self, id: EventId) -> RepoResult<Vec<AssignedPhotographer>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                a.id AS assignment_id,
                p.id AS id,
                p.name AS name,
                p.email AS email,
                p.phone AS phone,
                p.is_active AS is_active
             FROM assignments a
             INNER JOIN photographers p ON p.id = a.photographer_id
             WHERE a.event_id = ?1
             ORDER BY p.id ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let assignment_id: String = row.get("assignment_id")?;
            items.push(AssignedPhotographer {
                assignment_id: parse_uuid(&assignment_id, "assignments.id")?,
                photographer: parse_photographer_row(row)?,
            });
        }
        Ok(items)
    }
}

pub(crate) fn find_event(conn: &Connection, id: EventId) -> RepoResult<Option<Event>> {
    let mut stmt = conn.prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_event_row(row)?));
    }
    Ok(None)
}

pub(crate) fn event_has_assignments(conn: &Connection, id: EventId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM assignments WHERE event_id = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let id_text: String = row.get("id")?;
    let date_text: String = row.get("event_date")?;

    let event = Event {
        id: parse_uuid(&id_text, "events.id")?,
        name: row.get("name")?,
        event_date: parse_date(&date_text, "events.event_date")?,
        photographers_required: row.get("photographers_required")?,
        created_at: row.get("created_at")?,
    };
    event.validate()?;
    Ok(event)
}
