//! The file and module model of a release run
//!
//! - **file**: files of interest and their lifecycle behavior
//! - **module**: directories-as-modules and the module discovery scan
//! - **collections**: flat ancillary collections (solutions, notes, docs, …)
//! - **project**: descriptor analysis and output snapshots
//! - **sample**: the sample-project reference rewriter
//! - **readme**: keyword templating for release notes
//! - **solution**: solution file analysis
//! - **tree**: the top-level project tree and its phase state machine

pub mod collections;
pub mod file;
pub mod module;
pub mod project;
pub mod readme;
pub mod sample;
pub mod solution;
pub mod tree;
