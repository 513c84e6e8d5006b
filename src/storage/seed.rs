//! Seed data
//!
//! Populates a pristine store with the demo roster: eleven users with ids
//! 1..=11 and one CREATE entry per user, stamped at initialization time.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::audit::AuditLogEntry;
use crate::error::{UserMgmtError, UserMgmtResult};
use crate::models::User;

use super::repository::Repository;
use super::table::Tables;

/// (forename, surname, date of birth, email, active)
const SEED_USERS: [(&str, &str, (i32, u32, u32), &str, bool); 11] = [
    ("Peter", "Loew", (1998, 5, 2), "ploew@example.com", true),
    ("Benjamin Franklin", "Gates", (1967, 8, 27), "bfgates@example.com", true),
    ("Castor", "Troy", (1972, 11, 10), "ctroy@example.com", false),
    ("Memphis", "Raines", (1983, 9, 3), "mraines@example.com", true),
    ("Stanley", "Goodspeed", (1950, 1, 1), "sgodspeed@example.com", true),
    ("H.I.", "McDunnough", (2004, 12, 8), "himcdunnough@example.com", true),
    ("Cameron", "Poe", (1992, 4, 14), "cpoe@example.com", false),
    ("Edward", "Malus", (1977, 3, 23), "emalus@example.com", false),
    ("Damon", "Macready", (1986, 7, 25), "dmacready@example.com", false),
    ("Johnny", "Blaze", (1970, 1, 11), "jblaze@example.com", true),
    ("Robin", "Feld", (2001, 7, 7), "rfeld@example.com", true),
];

/// The demo roster, not yet persisted
pub fn seed_users() -> UserMgmtResult<Vec<User>> {
    SEED_USERS
        .iter()
        .map(|&(forename, surname, (y, m, d), email, active)| {
            let date_of_birth = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| {
                UserMgmtError::Storage(format!("Invalid seed date {}-{}-{}", y, m, d))
            })?;
            Ok(User::new(forename, surname, email, date_of_birth).active(active))
        })
        .collect()
}

/// Write `users` and their CREATE entries into pristine tables
///
/// Returns false, leaving `tables` untouched, if anything was ever written.
fn seed_tables(tables: &mut Tables, users: Vec<User>, at: DateTime<Utc>) -> bool {
    if !tables.is_pristine() {
        return false;
    }

    for user in users {
        let id = tables.users.insert(user);
        if let Some(record) = tables.users.get(id).map(User::to_record) {
            tables
                .user_logs
                .insert(AuditLogEntry::created(record).at(at));
        }
    }
    true
}

/// Seed a pristine store in one commit
///
/// Returns `Ok(false)` without writing when the store already has data.
pub fn initialize(repo: &Repository) -> UserMgmtResult<bool> {
    if !repo.is_pristine() {
        return Ok(false);
    }

    let users = seed_users()?;
    let count = users.len();
    let seeded = repo
        .commit(|tables| Ok(seed_tables(tables, users, Utc::now())))
        .map_err(|e| UserMgmtError::Storage(e.to_string()))?;

    if seeded {
        info!(users = count, "seeded store");
    }
    Ok(seeded)
}

impl Repository {
    /// An in-memory store holding the seed data
    pub fn seeded() -> UserMgmtResult<Self> {
        let repo = Self::in_memory();
        initialize(&repo)?;
        Ok(repo)
    }
}
