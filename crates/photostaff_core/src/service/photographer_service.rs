//! Photographer use-case service.
//!
//! # Responsibility
//! - Register photographers and manage their active flag.
//! - Surface duplicate emails as a dedicated error.

use crate::model::photographer::{Photographer, PhotographerId, PhotographerValidationError};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::photographer_repo::{PhotographerListQuery, PhotographerRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for photographer use-cases.
#[derive(Debug)]
pub enum PhotographerServiceError {
    Validation(PhotographerValidationError),
    DuplicateEmail(String),
    PhotographerNotFound(PhotographerId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for PhotographerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateEmail(email) => {
                write!(f, "photographer email already registered: {email}")
            }
            Self::PhotographerNotFound(id) => write!(f, "photographer not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent photographer state: {details}")
            }
        }
    }
}

impl Error for PhotographerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PhotographerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PhotographerValidation(err) => Self::Validation(err),
            RepoError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            RepoError::PhotographerNotFound(id) => Self::PhotographerNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Photographer service facade over repository implementations.
pub struct PhotographerService<R: PhotographerRepository> {
    repo: R,
}

impl<R: PhotographerRepository> PhotographerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new active photographer.
    pub fn register_photographer(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Photographer, PhotographerServiceError> {
        let photographer = Photographer::new(name, email, phone);
        let id = self.repo.create_photographer(&photographer)?;
        info!("event=photographer_register module=service status=ok photographer_id={id}");

        self.repo
            .get_photographer(id)?
            .ok_or(PhotographerServiceError::InconsistentState(
                "registered photographer not found in read-back",
            ))
    }

    pub fn get_photographer(&self, id: PhotographerId) -> RepoResult<Option<Photographer>> {
        self.repo.get_photographer(id)
    }

    /// Looks up a photographer by email, case-insensitively.
    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<Photographer>> {
        self.repo.find_by_email(email)
    }

    /// Lists photographers by ascending id.
    pub fn list_photographers(&self, include_inactive: bool) -> RepoResult<Vec<Photographer>> {
        self.repo
            .list_photographers(&PhotographerListQuery { include_inactive })
    }

    /// Replaces contact fields and active flag of an existing photographer.
    pub fn update_photographer(
        &self,
        photographer: &Photographer,
    ) -> Result<Photographer, PhotographerServiceError> {
        self.repo.update_photographer(photographer)?;
        self.repo
            .get_photographer(photographer.id)?
            .ok_or(PhotographerServiceError::InconsistentState(
                "updated photographer not found in read-back",
            ))
    }

    /// Toggles eligibility for future assignments. Existing assignments stay.
    pub fn set_active(
        &self,
        id: PhotographerId,
        is_active: bool,
    ) -> Result<(), PhotographerServiceError> {
        self.repo.set_active(id, is_active)?;
        info!(
            "event=photographer_set_active module=service status=ok photographer_id={id} is_active={is_active}"
        );
        Ok(())
    }

    /// Deletes a photographer and, through cascade, their assignments.
    pub fn delete_photographer(&self, id: PhotographerId) -> Result<(), PhotographerServiceError> {
        self.repo.delete_photographer(id)?;
        info!("event=photographer_delete module=service status=ok photographer_id={id}");
        Ok(())
    }
}
