//! File-system scanning
//!
//! - **scanner**: the generic recursive walk, parameterized by a directory
//!   hook and a file classifier
//! - **path**: subdirectory-sequence algebra shared by logical-name and
//!   project-reference resolution

pub mod path;
pub mod scanner;
