//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{SendEventCommandHandler, SubmitCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Settings, SubmitInputs};
use crate::error::AppResult;

/// Execute a CLI command with the given settings
///
/// # Errors
/// Returns errors from input validation or the command handlers
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Commands::Submit {
            pool_name,
            registry_address,
            event_grid_endpoint,
            event_grid_key,
            dry_run,
        } => {
            // Validate every input before anything is built or sent
            let inputs = SubmitInputs::new(
                pool_name,
                registry_address,
                event_grid_endpoint,
                event_grid_key,
            )?;
            tracing::debug!(?inputs, dry_run, "Submit inputs validated");

            SubmitCommandHandler::new(settings)
                .execute(inputs, *dry_run)
                .await
        }
        Commands::SendEvent { dry_run } => {
            SendEventCommandHandler::new(settings)
                .execute(*dry_run)
                .await
        }
    }
}
