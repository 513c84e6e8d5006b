//! Configuration module for usermgmt
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::UserMgmtPaths;
pub use settings::Settings;
