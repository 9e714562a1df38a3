//! Command-line interface module.

mod args;
pub mod decorate;
pub mod import;

pub use args::{Cli, Commands, DecorateArgs, ImportArgs};
