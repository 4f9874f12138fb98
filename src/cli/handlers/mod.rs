//! Command handlers for CLI operations
//!
//! This module contains handlers for the CLI subcommands,
//! separating command execution logic from parsing and validation.

pub mod send_event;
pub mod submit;

pub use send_event::SendEventCommandHandler;
pub use submit::SubmitCommandHandler;
