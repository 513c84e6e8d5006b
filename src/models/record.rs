//! Point-in-time snapshot of a user's fields
//!
//! Audit log entries hold these rather than live users so that later edits
//! and deletes never rewrite history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Immutable value-copy of a [`super::User`] at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Id of the user the snapshot was taken from
    pub id: UserId,
    pub forename: String,
    pub surname: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub is_active: bool,
}
