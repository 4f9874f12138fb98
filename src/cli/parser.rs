//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Submit dependent container tasks and report job completion
#[derive(Parser, Debug)]
#[command(name = "batchflow")]
#[command(about = "Submit dependent container tasks and report job completion")]
#[command(long_about = "
batchflow submits a two-task job to a batch service: a workload task and a
notifier task that runs only after the workload task succeeded. The notifier
task runs `batchflow send-event`, which posts a single completion event to an
event ingestion endpoint.

EXAMPLES:
    # Submit a job to pool 'p1' using images from 'myreg.io'
    batchflow submit p1 myreg.io https://topic.region.eventgrid.azure.net/api/events <key>

    # Print the job and both tasks without contacting the batch service
    batchflow submit --dry-run p1 myreg.io https://eg.example/api/events <key>

    # Send the completion event (inside the notifier container)
    batchflow send-event

    # Use a custom configuration file with verbose logging
    batchflow --config /etc/batchflow/production.toml --verbose submit ...

ENVIRONMENT:
    submit:      BATCH_ACCOUNT_NAME, BATCH_ACCOUNT_KEY, BATCH_ACCOUNT_URL
    send-event:  GRID_ENDPOINT, GRID_KEY, AZ_BATCH_JOB_ID
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load settings from this TOML file only, instead of the layered
    /// `config/` directory. The file must exist and be readable.
    ///
    /// Example: --config /etc/batchflow/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `config/{environment}.toml` is layered over the defaults.
    ///
    /// Available values: development (dev), test, staging, production (prod)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Forces the log level to debug. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Forces the log level to error. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit the workload job with its completion notifier task
    ///
    /// Creates a job on the pool, adds the workload task, then adds a
    /// notifier task that depends on it. Prints the created job as JSON.
    ///
    /// Examples:
    ///   batchflow submit p1 myreg.io https://eg.example/api/events k1
    ///   batchflow submit --dry-run p1 myreg.io https://eg.example/api/events k1
    Submit {
        /// Pool the job runs on
        #[arg(value_name = "POOL_NAME")]
        pool_name: String,

        /// Container registry the task images are pulled from
        #[arg(value_name = "REGISTRY_ADDRESS")]
        registry_address: String,

        /// Event ingestion endpoint the notifier posts to
        #[arg(value_name = "EVENT_GRID_ENDPOINT")]
        event_grid_endpoint: String,

        /// Access key of the event ingestion endpoint
        #[arg(value_name = "EVENT_GRID_KEY")]
        event_grid_key: String,

        /// Print the job and its tasks without submitting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Post the job completion event
    ///
    /// Reads GRID_ENDPOINT, GRID_KEY and AZ_BATCH_JOB_ID from the environment
    /// and posts one `jobFinished` event for the job.
    SendEvent {
        /// Print the event body instead of posting it
        #[arg(long)]
        dry_run: bool,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
