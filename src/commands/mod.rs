//! Command implementations

pub mod inspect;
pub mod pack;
pub mod setup;

pub use inspect::run_inspect;
pub use pack::run_pack;
pub use setup::run_setup;
