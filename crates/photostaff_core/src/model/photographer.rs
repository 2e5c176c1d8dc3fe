//! Photographer domain model.
//!
//! # Responsibility
//! - Define the staff record that can be assigned to events.
//! - Validate contact fields before they reach storage.
//!
//! # Invariants
//! - `email` is stored lowercase; uniqueness is case-insensitive.
//! - Only `is_active` photographers are eligible for new assignments.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a photographer.
pub type PhotographerId = Uuid;

pub const PHOTOGRAPHER_NAME_MAX_CHARS: usize = 255;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const PHONE_MAX_CHARS: usize = 20;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photographer {
    pub id: PhotographerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_active: bool,
}

/// Structural validation failures for `Photographer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotographerValidationError {
    NilId,
    BlankName,
    NameTooLong { max: usize, actual: usize },
    InvalidEmail,
    EmailTooLong { max: usize, actual: usize },
    PhoneTooLong { max: usize, actual: usize },
}

impl Display for PhotographerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "photographer id must not be nil"),
            Self::BlankName => write!(f, "photographer name must not be blank"),
            Self::NameTooLong { max, actual } => write!(
                f,
                "photographer name has {actual} characters; at most {max} allowed"
            ),
            Self::InvalidEmail => write!(f, "photographer email is not a valid address"),
            Self::EmailTooLong { max, actual } => {
                write!(f, "email has {actual} characters; at most {max} allowed")
            }
            Self::PhoneTooLong { max, actual } => {
                write!(f, "phone has {actual} characters; at most {max} allowed")
            }
        }
    }
}

impl Error for PhotographerValidationError {}

impl Photographer {
    /// Creates an active photographer with a generated id.
    ///
    /// Email is trimmed and lowercased; other fields are trimmed.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            email: normalize_email(&email.into()),
            phone: phone.into().trim().to_string(),
            is_active: true,
        }
    }

    /// Checks field invariants required before persistence.
    pub fn validate(&self) -> Result<(), PhotographerValidationError> {
        if self.id.is_nil() {
            return Err(PhotographerValidationError::NilId);
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(PhotographerValidationError::BlankName);
        }
        check_len(name, PHOTOGRAPHER_NAME_MAX_CHARS).map_err(|(max, actual)| {
            PhotographerValidationError::NameTooLong { max, actual }
        })?;

        check_len(&self.email, EMAIL_MAX_CHARS)
            .map_err(|(max, actual)| PhotographerValidationError::EmailTooLong { max, actual })?;
        if !EMAIL_RE.is_match(&self.email) {
            return Err(PhotographerValidationError::InvalidEmail);
        }

        check_len(&self.phone, PHONE_MAX_CHARS)
            .map_err(|(max, actual)| PhotographerValidationError::PhoneTooLong { max, actual })?;
        Ok(())
    }
}

/// Canonical email form used for storage and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_len(value: &str, max: usize) -> Result<(), (usize, usize)> {
    let actual = value.chars().count();
    if actual > max {
        Err((max, actual))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Photographer, PhotographerValidationError, PHONE_MAX_CHARS};

    #[test]
    fn new_normalizes_email_and_defaults_active() {
        let photographer = Photographer::new(" Ana ", " Ana@Example.COM ", "555-0100");
        assert_eq!(photographer.name, "Ana");
        assert_eq!(photographer.email, "ana@example.com");
        assert!(photographer.is_active);
        assert!(photographer.validate().is_ok());
    }

    #[test]
    fn validate_rejects_malformed_email() {
        for email in ["", "ana", "ana@", "ana@example", "a b@example.com"] {
            let photographer = Photographer::new("Ana", email, "");
            assert_eq!(
                photographer.validate(),
                Err(PhotographerValidationError::InvalidEmail),
                "email `{email}` should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_long_phone() {
        let photographer = Photographer::new("Ana", "ana@example.com", "9".repeat(PHONE_MAX_CHARS + 1));
        assert!(matches!(
            photographer.validate(),
            Err(PhotographerValidationError::PhoneTooLong { .. })
        ));
    }
}
