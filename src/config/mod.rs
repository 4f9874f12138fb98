//! Configuration management module for batchflow
//!
//! Layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Per-environment files (development, test, staging, production)
//! - Explicit runtime inputs (credentials, endpoints) gathered once at startup
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml`
//! 4. `BATCHFLOW_*` environment variables

pub mod environment;
pub mod error;
pub mod inputs;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use inputs::{BatchCredentials, NotifierConfig, SubmitInputs};
pub use loader::ConfigLoader;
pub use settings::{BatchConfig, EventGridConfig, Settings};
