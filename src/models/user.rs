//! User model
//!
//! The only audited entity kind. Users are owned by the store: callers fetch a
//! copy, change its fields, and submit it back through the repository.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;
use super::record::UserRecord;

/// Minimum length of a forename or surname
const NAME_MIN_LEN: usize = 2;

/// Maximum length of a forename or surname
const NAME_MAX_LEN: usize = 50;

/// A managed user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier (unassigned until created)
    #[serde(default)]
    pub id: UserId,

    pub forename: String,

    pub surname: String,

    pub date_of_birth: NaiveDate,

    pub email: String,

    /// Whether the account is active
    #[serde(default)]
    pub is_active: bool,
}

impl User {
    /// Create a new, not yet persisted, inactive user
    pub fn new(
        forename: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: UserId::UNASSIGNED,
            forename: forename.into(),
            surname: surname.into(),
            date_of_birth,
            email: email.into(),
            is_active: false,
        }
    }

    /// Builder-style active flag
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }

    /// Capture the current field values as an immutable snapshot
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.id,
            forename: self.forename.clone(),
            surname: self.surname.clone(),
            date_of_birth: self.date_of_birth,
            email: self.email.clone(),
            is_active: self.is_active,
        }
    }

    /// Validate the user's fields against today's date
    pub fn validate(&self) -> Result<(), UserValidationError> {
        self.validate_as_of(Local::now().date_naive())
    }

    /// Validate the user's fields, treating `today` as the current date
    pub fn validate_as_of(&self, today: NaiveDate) -> Result<(), UserValidationError> {
        check_name(&self.forename, NameField::Forename)?;
        check_name(&self.surname, NameField::Surname)?;

        if !looks_like_email(self.email.trim()) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }

        if self.date_of_birth >= today {
            return Err(UserValidationError::DateOfBirthNotInPast(self.date_of_birth));
        }

        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.full_name(), self.email)
    }
}

fn check_name(value: &str, field: NameField) -> Result<(), UserValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(UserValidationError::Required(field));
    }
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(UserValidationError::NameLength(field, len));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Which name field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Forename,
    Surname,
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forename => write!(f, "Forename"),
            Self::Surname => write!(f, "Surname"),
        }
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    Required(NameField),
    NameLength(NameField, usize),
    InvalidEmail(String),
    DateOfBirthNotInPast(NaiveDate),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(field) => write!(f, "{} is required", field),
            Self::NameLength(field, len) => write!(
                f,
                "{} must be between {} and {} characters (got {})",
                field, NAME_MIN_LEN, NAME_MAX_LEN, len
            ),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{}'", email),
            Self::DateOfBirthNotInPast(date) => {
                write!(f, "Date of birth must be in the past (got {})", date)
            }
        }
    }
}

impl std::error::Error for UserValidationError {}
