//! Command-line interface module.

mod args;
pub mod compile;
pub mod locate;

pub use args::{Cli, Commands, CompileArgs};
