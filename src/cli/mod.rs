//! Command-line interface module.

mod args;
pub mod restore;
pub mod run;

pub use args::{Cli, Commands};
