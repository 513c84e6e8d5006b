//! Export module for usermgmt
//!
//! Full dumps of users and the audit trail:
//! - JSON: machine-readable
//! - YAML: human-readable

pub mod json;
pub mod yaml;

pub use json::{export_full_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
