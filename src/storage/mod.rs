//! Storage layer for usermgmt
//!
//! Provides the generic [`Repository`] over every [`Entity`] kind, the
//! in-memory tables it commits to, optional JSON file persistence with
//! atomic writes, and the seed data used to initialize a fresh store.

pub mod entity;
pub mod file_io;
pub mod repository;
pub mod seed;
pub mod table;

pub use entity::Entity;
pub use file_io::{read_json, write_json_atomic};
pub use repository::{CommitError, Repository};
pub use seed::{initialize, seed_users};
pub use table::{Table, Tables};
