//! Command-line interface module.

mod args;
pub mod connect;
pub mod inspect;

pub use args::{AgentArgs, Cli, Commands};
