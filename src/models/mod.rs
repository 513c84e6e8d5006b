//! Core data models for usermgmt
//!
//! This module contains the persisted user entity, its point-in-time
//! snapshot, and the strongly-typed identifiers shared by every entity kind.

pub mod ids;
pub mod record;
pub mod user;

pub use ids::{EntityKey, LogId, UserId};
pub use record::UserRecord;
pub use user::{NameField, User, UserValidationError};
