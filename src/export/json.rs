//! JSON export
//!
//! Dumps every user and every audit entry, with schema versioning and
//! summary counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::audit::AuditLogEntry;
use crate::error::{UserMgmtError, UserMgmtResult};
use crate::models::User;
use crate::storage::Repository;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full store export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub users: Vec<User>,

    /// Every audit entry, oldest first, including those of deleted users
    pub audit_log: Vec<AuditLogEntry>,

    pub metadata: ExportMetadata,
}

/// Summary counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub user_count: usize,
    pub active_user_count: usize,
    pub log_count: usize,
}

impl FullExport {
    /// Build an export from one consistent snapshot of the store
    pub fn from_repository(repo: &Repository) -> Self {
        let tables = repo.snapshot();
        let users = tables.users.rows().to_vec();
        let audit_log = tables.user_logs.rows().to_vec();

        let metadata = ExportMetadata {
            user_count: users.len(),
            active_user_count: users.iter().filter(|u| u.is_active).count(),
            log_count: audit_log.len(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            users,
            audit_log,
            metadata,
        }
    }

    /// Check schema version, counts, and that entries describe their own user
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        if self.metadata.user_count != self.users.len()
            || self.metadata.log_count != self.audit_log.len()
        {
            return Err("Metadata counts do not match exported rows".to_string());
        }

        if let Some(entry) = self
            .audit_log
            .iter()
            .find(|entry| entry.new_state.id != entry.user_id)
        {
            return Err(format!(
                "Audit entry {} describes {} but is filed under {}",
                entry.id, entry.new_state.id, entry.user_id
            ));
        }

        Ok(())
    }
}

/// Export the full store to JSON
pub fn export_full_json<W: Write>(
    repo: &Repository,
    writer: &mut W,
    pretty: bool,
) -> UserMgmtResult<FullExport> {
    let export = FullExport::from_repository(repo);
    export.validate().map_err(UserMgmtError::Export)?;

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| UserMgmtError::Export(e.to_string()))?;

    Ok(export)
}
