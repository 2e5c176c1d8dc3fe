//! Photographer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `photographers` table.
//! - Translate the email uniqueness constraint into `DuplicateEmail`.
//!
//! # Invariants
//! - Write paths must call `Photographer::validate()` before SQL mutations.
//! - Listing is deterministic: `id ASC`.
//! - Deleting a photographer cascades to their assignments.

use crate::model::photographer::{normalize_email, Photographer, PhotographerId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::{bool_to_int, is_unique_violation, parse_bool, parse_uuid};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) const PHOTOGRAPHER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    is_active
FROM photographers";

/// Query options for listing photographers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotographerListQuery {
    pub include_inactive: bool,
}

/// Repository interface for photographer records.
pub trait PhotographerRepository {
    fn create_photographer(&self, photographer: &Photographer) -> RepoResult<PhotographerId>;
    fn update_photographer(&self, photographer: &Photographer) -> RepoResult<()>;
    fn get_photographer(&self, id: PhotographerId) -> RepoResult<Option<Photographer>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Photographer>>;
    fn list_photographers(&self, query: &PhotographerListQuery) -> RepoResult<Vec<Photographer>>;
    fn set_active(&self, id: PhotographerId, is_active: bool) -> RepoResult<()>;
    /// Hard-deletes one photographer together with their assignments.
    fn delete_photographer(&self, id: PhotographerId) -> RepoResult<()>;
}

/// SQLite-backed photographer repository.
pub struct SqlitePhotographerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePhotographerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PhotographerRepository for SqlitePhotographerRepository<'_> {
    fn create_photographer(&self, photographer: &Photographer) -> RepoResult<PhotographerId> {
        photographer.validate()?;

        self.conn
            .execute(
                "INSERT INTO photographers (
                    id,
                    name,
                    email,
                    phone,
                    is_active
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    photographer.id.to_string(),
                    photographer.name.trim(),
                    normalize_email(&photographer.email),
                    photographer.phone.trim(),
                    bool_to_int(photographer.is_active),
                ],
            )
            .map_err(|err| map_email_conflict(err, &photographer.email))?;

        Ok(photographer.id)
    }

    fn update_photographer(&self, photographer: &Photographer) -> RepoResult<()> {
        photographer.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE photographers
                 SET
                    name = ?1,
                    email = ?2,
                    phone = ?3,
                    is_active = ?4
                 WHERE id = ?5;",
                params![
                    photographer.name.trim(),
                    normalize_email(&photographer.email),
                    photographer.phone.trim(),
                    bool_to_int(photographer.is_active),
                    photographer.id.to_string(),
                ],
            )
            .map_err(|err| map_email_conflict(err, &photographer.email))?;

        if changed == 0 {
            return Err(RepoError::PhotographerNotFound(photographer.id));
        }

        Ok(())
    }

    fn get_photographer(&self, id: PhotographerId) -> RepoResult<Option<Photographer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PHOTOGRAPHER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_photographer_row(row)?));
        }
        Ok(None)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Photographer>> {
        let id_text: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM photographers WHERE email = ?1 COLLATE NOCASE;",
                [normalize_email(email)],
                |row| row.get(0),
            )
            .optional()?;

        match id_text {
            Some(value) => self.get_photographer(parse_uuid(&value, "photographers.id")?),
            None => Ok(None),
        }
    }

    fn list_photographers(&self, query: &PhotographerListQuery) -> RepoResult<Vec<Photographer>> {
        let sql = if query.include_inactive {
            format!("{PHOTOGRAPHER_SELECT_SQL} ORDER BY id ASC;")
        } else {
            format!("{PHOTOGRAPHER_SELECT_SQL} WHERE is_active = 1 ORDER BY id ASC;")
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_photographer_row(row)?);
        }
        Ok(items)
    }

    fn set_active(&self, id: PhotographerId, is_active: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE photographers SET is_active = ?1 WHERE id = ?2;",
            params![bool_to_int(is_active), id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::PhotographerNotFound(id));
        }
        Ok(())
    }

    fn delete_photographer(&self, id: PhotographerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM photographers WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::PhotographerNotFound(id));
        }
        Ok(())
    }
}

/// Parses a row exposing `id, name, email, phone, is_active` columns.
pub(crate) fn parse_photographer_row(row: &Row<'_>) -> RepoResult<Photographer> {
    let id_text: String = row.get("id")?;
    let photographer = Photographer {
        id: parse_uuid(&id_text, "photographers.id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        is_active: parse_bool(row.get("is_active")?, "photographers.is_active")?,
    };
    photographer.validate()?;
    Ok(photographer)
}

fn map_email_conflict(err: rusqlite::Error, email: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateEmail(normalize_email(email))
    } else {
        err.into()
    }
}
