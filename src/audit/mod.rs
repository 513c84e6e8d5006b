//! Audit trail for usermgmt
//!
//! Every create, update and delete of a user produces exactly one
//! [`AuditLogEntry`], committed by the repository in the same atomic unit as
//! the mutation itself. Entries are append-only and outlive the user they
//! describe.
//!
//! # Architecture
//!
//! - `AuditLogEntry`: action, affected user id, optional prior snapshot,
//!   new snapshot and timestamp.
//! - `LogAction`: CREATE, READ (reserved), UPDATE, DELETE.
//! - `generate_diff` / `field_changes`: human-readable differences between
//!   the prior and new snapshot of an UPDATE.
//!
//! # Example
//!
//! ```rust,ignore
//! use usermgmt::audit::{AuditLogEntry, LogAction};
//!
//! let entry = AuditLogEntry::updated(before.to_record(), after.to_record());
//! assert_eq!(entry.action, LogAction::Update);
//! println!("{}", entry.format_human_readable());
//! ```

mod diff;
mod entry;

pub use diff::{field_changes, generate_diff, FieldChange};
pub use entry::{AuditLogEntry, LogAction};
