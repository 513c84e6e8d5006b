//! YAML export
//!
//! Same content as the JSON export, prefixed with a comment header for
//! people reading the file.

use std::io::Write;

use crate::error::{UserMgmtError, UserMgmtResult};
use crate::export::json::FullExport;
use crate::storage::Repository;

/// Export the full store to YAML
pub fn export_full_yaml<W: Write>(repo: &Repository, writer: &mut W) -> UserMgmtResult<FullExport> {
    let export = FullExport::from_repository(repo);
    export.validate().map_err(UserMgmtError::Export)?;

    let header = format!(
        "# usermgmt export\n# Generated: {}\n# App Version: {}\n# Users: {}, audit entries: {}\n\n",
        export.exported_at,
        export.app_version,
        export.metadata.user_count,
        export.metadata.log_count
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| UserMgmtError::Export(e.to_string()))?;

    serde_yaml::to_writer(&mut *writer, &export).map_err(|e| UserMgmtError::Export(e.to_string()))?;

    Ok(export)
}
