//! Terminal display formatting
//!
//! Renders users and audit entries for CLI output.

pub mod user;

pub use user::{format_log_list, format_user_details, format_user_list};
