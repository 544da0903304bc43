//! Shared utilities.

pub mod exec;
pub mod hash;
pub mod plural;

pub use plural::plural_count;
