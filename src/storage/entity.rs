//! Entity kinds known to the store
//!
//! The repository is generic over [`Entity`]. Per-kind behaviour is expressed
//! through the trait's hooks rather than by inspecting the concrete type:
//! a kind that returns a snapshot gets an audit trail, and an append-only kind
//! refuses updates and deletes.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::audit::AuditLogEntry;
use crate::models::{EntityKey, LogId, User, UserId, UserRecord};

use super::table::{Table, Tables};

/// A persisted record with a store-assigned id
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: EntityKey;

    /// Name used in logs and errors
    const KIND: &'static str;

    /// Rows of this kind can be appended but never updated or deleted
    const APPEND_ONLY: bool = false;

    fn id(&self) -> Self::Id;

    fn set_id(&mut self, id: Self::Id);

    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Snapshot recorded in the audit trail; `None` for unaudited kinds
    fn snapshot(&self) -> Option<UserRecord> {
        None
    }
}

impl Entity for User {
    type Id = UserId;

    const KIND: &'static str = "User";

    fn id(&self) -> UserId {
        self.id
    }

    fn set_id(&mut self, id: UserId) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.users
    }

    fn snapshot(&self) -> Option<UserRecord> {
        Some(self.to_record())
    }
}

impl Entity for AuditLogEntry {
    type Id = LogId;

    const KIND: &'static str = "UserLog";

    const APPEND_ONLY: bool = true;

    fn id(&self) -> LogId {
        self.id
    }

    fn set_id(&mut self, id: LogId) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.user_logs
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.user_logs
    }
}
