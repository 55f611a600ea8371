//! Core state shared across the agent.

mod state;

pub use state::{is_shutdown, register_shutdown, setup_shutdown_handler};
