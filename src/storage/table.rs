//! In-memory tables
//!
//! A [`Table`] keeps the rows of one entity kind in id order together with
//! the counter that hands out the next id. [`Tables`] is the whole committed
//! state of a store; it is cloned, staged and swapped by the repository.

use serde::{Deserialize, Serialize};

use crate::audit::AuditLogEntry;
use crate::models::{EntityKey, User};

use super::entity::Entity;

/// Rows of one entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table<T> {
    /// Next id to hand out; only ever grows
    next_id: i64,
    /// Sorted by id, which is also insertion order
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T: Entity> Table<T> {
    fn position(&self, id: T::Id) -> Result<usize, usize> {
        self.rows.binary_search_by_key(&id, |row| row.id())
    }

    /// Assign the next id to `row` and append it; returns the id
    pub fn insert(&mut self, mut row: T) -> T::Id {
        let id = T::Id::from_raw(self.next_id);
        self.next_id += 1;
        row.set_id(id);
        self.rows.push(row);
        id
    }

    /// Get a row by id
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.position(id).ok().map(|idx| &self.rows[idx])
    }

    /// Replace the row with the same id; returns the previous row
    pub fn replace(&mut self, row: T) -> Option<T> {
        let idx = self.position(row.id()).ok()?;
        Some(std::mem::replace(&mut self.rows[idx], row))
    }

    /// Remove a row by id
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let idx = self.position(id).ok()?;
        Some(self.rows.remove(idx))
    }

    /// All rows in insertion order
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether this table has ever handed out an id
    pub fn has_assigned_ids(&self) -> bool {
        self.next_id > 1
    }
}

/// The complete committed state of a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub users: Table<User>,
    #[serde(default)]
    pub user_logs: Table<AuditLogEntry>,
}

impl Tables {
    /// Table for entity kind `T`
    pub fn of<T: Entity>(&self) -> &Table<T> {
        T::table(self)
    }

    /// Mutable table for entity kind `T`
    pub fn of_mut<T: Entity>(&mut self) -> &mut Table<T> {
        T::table_mut(self)
    }

    /// Whether nothing has ever been written to any table
    pub fn is_pristine(&self) -> bool {
        !self.users.has_assigned_ids() && !self.user_logs.has_assigned_ids()
    }
}
