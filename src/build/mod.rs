//! External collaborators of the release process
//!
//! - **runner**: synchronous external build tool invocation
//! - **archive**: manifest-driven archive file creation

pub mod archive;
pub mod runner;
