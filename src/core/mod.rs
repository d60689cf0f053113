//! Core building blocks for relpack runs
//!
//! - **config**: application and project configuration (JSON)
//! - **context**: unified run context passed through every phase
//! - **diagnostics**: categorized message collector with end-of-run summary
//! - **error**: error types with contextual help messages and exit codes
//! - **version**: release version parsing and derived version strings

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod version;
