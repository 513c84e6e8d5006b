//! User service
//!
//! Thin domain layer over the repository: status filtering, exactly-one
//! lookups, and retrieval of a user's audit trail. It holds no state of its
//! own.

use crate::audit::AuditLogEntry;
use crate::error::{UserMgmtError, UserMgmtResult};
use crate::models::{User, UserId};
use crate::storage::Repository;

/// Service for user management
pub struct UserService<'a> {
    repo: &'a Repository,
}

impl<'a> UserService<'a> {
    /// Create a new user service
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    /// All users, in creation order
    pub fn get_all_users(&self) -> Vec<User> {
        self.repo.get_all::<User>()
    }

    /// Users whose active flag equals `is_active`
    pub fn filter_by_active(&self, is_active: bool) -> Vec<User> {
        self.repo
            .get_all::<User>()
            .into_iter()
            .filter(|user| user.is_active == is_active)
            .collect()
    }

    /// The single user with this id
    ///
    /// Fails with a not-found error when no user, or more than one, matches.
    pub fn get_user_by_id(&self, id: UserId) -> UserMgmtResult<User> {
        let mut matches = self
            .repo
            .get_all::<User>()
            .into_iter()
            .filter(|user| user.id == id);

        match (matches.next(), matches.next()) {
            (Some(user), None) => Ok(user),
            _ => Err(UserMgmtError::user_not_found(id.to_string())),
        }
    }

    /// Create a user; on success `user.id` holds the assigned id
    pub fn add_user(&self, user: &mut User) -> bool {
        self.repo.create(user)
    }

    /// Persist the fields of an existing user
    pub fn update(&self, user: &User) -> bool {
        self.repo.update(user)
    }

    /// Look up a user and delete it
    ///
    /// A failed lookup is an error; a failed commit is `Ok(false)`.
    pub fn delete_user_by_id(&self, id: UserId) -> UserMgmtResult<bool> {
        let user = self.get_user_by_id(id)?;
        Ok(self.repo.delete(&user))
    }

    /// Audit entries describing `id`, oldest first
    ///
    /// Entries remain available after the user is deleted.
    pub fn get_logs_by_user_id(&self, id: UserId) -> Vec<AuditLogEntry> {
        self.repo
            .get_all::<AuditLogEntry>()
            .into_iter()
            .filter(|log| log.user_id == id)
            .collect()
    }

    /// Every audit entry, oldest first
    pub fn get_all_logs(&self) -> Vec<AuditLogEntry> {
        self.repo.get_all::<AuditLogEntry>()
    }

    /// The most recent `count` audit entries, oldest first
    pub fn recent_logs(&self, count: usize) -> Vec<AuditLogEntry> {
        let mut logs = self.repo.get_all::<AuditLogEntry>();
        let start = logs.len().saturating_sub(count);
        logs.split_off(start)
    }
}
