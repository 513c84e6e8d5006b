//! Custom error types for usermgmt
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Failures while committing a mutation are
//! classified separately by [`crate::storage::CommitError`] and never escape
//! the repository's boolean operations.

use thiserror::Error;

/// The main error type for usermgmt operations
#[derive(Error, Debug)]
pub enum UserMgmtError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Validation errors for caller-supplied users
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup by id matched zero records, or more than one
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl UserMgmtError {
    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for UserMgmtError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for usermgmt operations
pub type UserMgmtResult<T> = Result<T, UserMgmtError>;
