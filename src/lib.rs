//! usermgmt - user management with an append-only audit trail
//!
//! This library provides a small user directory backed by a generic
//! repository. Every mutation of a [`models::User`] is committed together
//! with an [`audit::AuditLogEntry`] describing it, so the trail and the data
//! can never disagree.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: User entity, ids and snapshots
//! - `audit`: Audit entries and change diffs
//! - `storage`: Repository, commit model and seed data
//! - `services`: User-facing operations over the repository
//! - `export`: Full JSON/YAML exports
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use usermgmt::models::User;
//! use usermgmt::services::UserService;
//! use usermgmt::storage::Repository;
//!
//! let repo = Repository::in_memory();
//! let service = UserService::new(&repo);
//! let mut user = User::new("Ada", "Lovelace", "ada@example.com", dob);
//! assert!(service.add_user(&mut user));
//! assert_eq!(service.get_logs_by_user_id(user.id).len(), 1);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{UserMgmtError, UserMgmtResult};
