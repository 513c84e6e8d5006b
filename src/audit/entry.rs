//! Audit log entry data structures
//!
//! Defines the action kinds and the append-only entry recorded for every
//! mutation of a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LogId, UserId, UserRecord};

use super::diff::generate_diff;

/// Kinds of action an audit entry can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogAction {
    /// User was created
    Create,
    /// Reserved; no mutation path records reads
    Read,
    /// User was updated
    Update,
    /// User was deleted
    Delete,
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogAction::Create => write!(f, "CREATE"),
            LogAction::Read => write!(f, "READ"),
            LogAction::Update => write!(f, "UPDATE"),
            LogAction::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single audit log entry
///
/// Records one mutation of one user. Entries reference the user by id only,
/// so they outlive the user they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Store-assigned identifier
    #[serde(default)]
    pub id: LogId,

    /// The user this entry describes
    pub user_id: UserId,

    /// State before the mutation (updates only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_state: Option<UserRecord>,

    /// State after the mutation; for deletes, the state that was removed
    pub new_state: UserRecord,

    /// What happened
    pub action: LogAction,

    /// When the mutation happened (UTC)
    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    fn new(action: LogAction, prior_state: Option<UserRecord>, new_state: UserRecord) -> Self {
        Self {
            id: LogId::UNASSIGNED,
            user_id: new_state.id,
            prior_state,
            new_state,
            action,
            timestamp: Utc::now(),
        }
    }

    /// Entry for a newly inserted user
    pub fn created(new_state: UserRecord) -> Self {
        Self::new(LogAction::Create, None, new_state)
    }

    /// Entry for an update, from the stored state to the submitted one
    pub fn updated(prior_state: UserRecord, new_state: UserRecord) -> Self {
        Self::new(LogAction::Update, Some(prior_state), new_state)
    }

    /// Entry for a delete; `removed` is the state that was deleted
    pub fn deleted(removed: UserRecord) -> Self {
        Self::new(LogAction::Delete, None, removed)
    }

    /// Override the timestamp (seed data is stamped at store initialization)
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Human-readable list of fields that changed between prior and new state
    pub fn diff_summary(&self) -> Option<String> {
        let prior = self.prior_state.as_ref()?;
        let before = serde_json::to_value(prior).ok()?;
        let after = serde_json::to_value(&self.new_state).ok()?;
        generate_diff(&before, &after)
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} ({} {})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.id,
            self.action,
            self.user_id,
            self.new_state.forename,
            self.new_state.surname
        );

        if let Some(diff) = self.diff_summary() {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(forename: &str) -> UserRecord {
        UserRecord {
            id: UserId::new(3),
            forename: forename.to_string(),
            surname: "Troy".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1972, 11, 10).unwrap(),
            email: "ctroy@example.com".to_string(),
            is_active: false,
        }
    }

    #[test]
    fn test_action_display() {
        assert_eq!(LogAction::Create.to_string(), "CREATE");
        assert_eq!(LogAction::Read.to_string(), "READ");
        assert_eq!(LogAction::Update.to_string(), "UPDATE");
        assert_eq!(LogAction::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_created_entry() {
        let entry = AuditLogEntry::created(record("Castor"));

        assert_eq!(entry.action, LogAction::Create);
        assert_eq!(entry.user_id, UserId::new(3));
        assert!(!entry.id.is_assigned());
        assert!(entry.prior_state.is_none());
        assert_eq!(entry.new_state.forename, "Castor");
        assert!(entry.diff_summary().is_none());
    }

    #[test]
    fn test_updated_entry() {
        let entry = AuditLogEntry::updated(record("Castor"), record("Sean"));

        assert_eq!(entry.action, LogAction::Update);
        assert_eq!(entry.prior_state.as_ref().unwrap().forename, "Castor");
        assert_eq!(entry.new_state.forename, "Sean");
        assert_eq!(
            entry.diff_summary(),
            Some("forename: \"Castor\" -> \"Sean\"".to_string())
        );
    }

    #[test]
    fn test_deleted_entry_keeps_removed_state() {
        let entry = AuditLogEntry::deleted(record("Castor"));

        assert_eq!(entry.action, LogAction::Delete);
        assert!(entry.prior_state.is_none());
        assert_eq!(entry.new_state, record("Castor"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditLogEntry::updated(record("Castor"), record("Sean"));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"action\":\"UPDATE\""));

        let deserialized: AuditLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, entry);
    }

    #[test]
    fn test_create_omits_prior_state() {
        let entry = AuditLogEntry::created(record("Castor"));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("prior_state"));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditLogEntry::updated(record("Castor"), record("Sean"));

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE"));
        assert!(formatted.contains("usr-3"));
        assert!(formatted.contains("Sean Troy"));
        assert!(formatted.contains("Changes: forename"));
    }
}
