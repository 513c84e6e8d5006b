//! Generic repository with an atomic audit trail
//!
//! The repository is the only gateway to persisted state. Each mutation runs
//! as a single commit: it holds the write lock, stages its changes (the
//! entity change plus, for audited kinds, its log entry) on a copy of the
//! tables, persists the copy when file-backed, and only then swaps it in.
//! A failure anywhere discards the copy, so readers see either both writes
//! or neither.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use thiserror::Error;
use tracing::{debug, warn};

use crate::audit::AuditLogEntry;
use crate::error::UserMgmtResult;

use super::entity::Entity;
use super::file_io::{read_json, write_json_atomic};
use super::table::Tables;

/// Why a commit was rejected
///
/// Only the `try_*` operations expose this; the boolean operations log it
/// and report `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("{kind} {id} does not exist")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} entries are append-only")]
    AppendOnly { kind: &'static str },

    #[error("failed to persist commit: {0}")]
    Persist(String),
}

#[derive(Debug, Clone)]
enum Backend {
    Memory,
    File(PathBuf),
}

/// Shared handle to one store
///
/// Every commit clones all tables and, when file-backed, rewrites the whole
/// store file, so a write costs time proportional to the audit trail.
pub struct Repository {
    tables: RwLock<Tables>,
    backend: Backend,
}

impl Repository {
    /// An empty, isolated in-memory store
    pub fn in_memory() -> Self {
        Self::from_tables(Tables::default(), Backend::Memory)
    }

    /// Open a store persisted at `path`
    ///
    /// A missing file opens as an empty store; the file is written on the
    /// first commit.
    pub fn open(path: impl Into<PathBuf>) -> UserMgmtResult<Self> {
        let path = path.into();
        let tables = read_json::<Tables, _>(&path)?.unwrap_or_default();
        debug!(
            path = %path.display(),
            users = tables.users.len(),
            logs = tables.user_logs.len(),
            "opened store"
        );
        Ok(Self::from_tables(tables, Backend::File(path)))
    }

    fn from_tables(tables: Tables, backend: Backend) -> Self {
        Self {
            tables: RwLock::new(tables),
            backend,
        }
    }

    /// Backing file, if the store is persisted
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Memory => None,
            Backend::File(path) => Some(path),
        }
    }

    // Tables are swapped whole, so a poisoned guard still holds a committed state.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// All committed rows of kind `T`, in insertion order
    pub fn get_all<T: Entity>(&self) -> Vec<T> {
        self.read().of::<T>().rows().to_vec()
    }

    /// A committed row of kind `T` by id
    pub fn find<T: Entity>(&self, id: T::Id) -> Option<T> {
        self.read().of::<T>().get(id).cloned()
    }

    /// Number of committed rows of kind `T`
    pub fn count<T: Entity>(&self) -> usize {
        self.read().of::<T>().len()
    }

    /// Copy of the complete committed state
    pub fn snapshot(&self) -> Tables {
        self.read().clone()
    }

    /// Whether nothing has ever been committed to this store
    pub fn is_pristine(&self) -> bool {
        self.read().is_pristine()
    }

    /// Insert `entity` under a newly assigned id
    ///
    /// Any id the caller set is ignored. On success the new id is written
    /// back into `entity`; on failure `entity` and the store are unchanged.
    pub fn create<T: Entity>(&self, entity: &mut T) -> bool {
        succeeded::<T, _>("create", self.try_create(entity))
    }

    /// Replace the stored row that has `entity`'s id
    pub fn update<T: Entity>(&self, entity: &T) -> bool {
        succeeded::<T, _>("update", self.try_update(entity))
    }

    /// Remove the stored row that has `entity`'s id
    pub fn delete<T: Entity>(&self, entity: &T) -> bool {
        succeeded::<T, _>("delete", self.try_delete(entity))
    }

    /// [`Repository::create`], reporting why a commit failed
    pub fn try_create<T: Entity>(&self, entity: &mut T) -> Result<T::Id, CommitError> {
        let row = entity.clone();

        let id = self.commit(|tables| {
            let id = tables.of_mut::<T>().insert(row);
            if let Some(record) = tables.of::<T>().get(id).and_then(|row| row.snapshot()) {
                tables.user_logs.insert(AuditLogEntry::created(record));
            }
            Ok(id)
        })?;

        entity.set_id(id);
        debug!(kind = T::KIND, %id, "created");
        Ok(id)
    }

    /// [`Repository::update`], reporting why a commit failed
    pub fn try_update<T: Entity>(&self, entity: &T) -> Result<(), CommitError> {
        reject_append_only::<T>()?;
        let row = entity.clone();
        let id = row.id();

        self.commit(|tables| {
            if tables.of::<T>().get(id).is_none() {
                return Err(not_found::<T>(id));
            }

            // The prior state comes from the store, never from the caller's copy
            let prior = tables
                .of_mut::<T>()
                .replace(row)
                .ok_or_else(|| not_found::<T>(id))?;

            let current = tables.of::<T>().get(id).and_then(|row| row.snapshot());
            if let (Some(before), Some(after)) = (prior.snapshot(), current) {
                tables.user_logs.insert(AuditLogEntry::updated(before, after));
            }
            Ok(())
        })?;

        debug!(kind = T::KIND, %id, "updated");
        Ok(())
    }

    /// [`Repository::delete`], reporting why a commit failed
    pub fn try_delete<T: Entity>(&self, entity: &T) -> Result<(), CommitError> {
        reject_append_only::<T>()?;
        let id = entity.id();

        self.commit(|tables| {
            let removed = tables
                .of_mut::<T>()
                .remove(id)
                .ok_or_else(|| not_found::<T>(id))?;

            if let Some(record) = removed.snapshot() {
                tables.user_logs.insert(AuditLogEntry::deleted(record));
            }
            Ok(())
        })?;

        debug!(kind = T::KIND, %id, "deleted");
        Ok(())
    }

    /// Run `stage` against a copy of the tables and make it visible atomically
    pub(crate) fn commit<R>(
        &self,
        stage: impl FnOnce(&mut Tables) -> Result<R, CommitError>,
    ) -> Result<R, CommitError> {
        let mut guard = self.tables.write().unwrap_or_else(PoisonError::into_inner);

        let mut staged = guard.clone();
        let output = stage(&mut staged)?;

        if let Backend::File(path) = &self.backend {
            write_json_atomic(path, &staged).map_err(|e| CommitError::Persist(e.to_string()))?;
        }

        *guard = staged;
        Ok(output)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

fn succeeded<T: Entity, R>(operation: &'static str, result: Result<R, CommitError>) -> bool {
    match result {
        Ok(_) => true,
        Err(error) => {
            warn!(kind = T::KIND, operation, %error, "commit rejected");
            false
        }
    }
}

fn not_found<T: Entity>(id: T::Id) -> CommitError {
    CommitError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

fn reject_append_only<T: Entity>() -> Result<(), CommitError> {
    if T::APPEND_ONLY {
        return Err(CommitError::AppendOnly { kind: T::KIND });
    }
    Ok(())
}
