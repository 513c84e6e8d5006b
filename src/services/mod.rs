//! Service layer for usermgmt
//!
//! The service layer composes repository queries into the operations the
//! command-line surface needs.

pub mod user;

pub use user::UserService;
