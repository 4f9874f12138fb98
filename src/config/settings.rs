//! Configuration settings structures for batchflow
//!
//! Everything here can be loaded from TOML files and `BATCHFLOW_*` environment
//! variables. Every field has a default, so a container without a config
//! directory still gets a complete `Settings`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "batchflow".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_api_version() -> String {
    "2024-07-01.20.0".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_job_id_prefix() -> String {
    "test-container-job-".to_string()
}

fn default_primary_task_id_prefix() -> String {
    "test-container-task-".to_string()
}

fn default_notifier_task_id_prefix() -> String {
    "test-notification-task-".to_string()
}

fn default_primary_image() -> String {
    "progrium-stress".to_string()
}

fn default_primary_command_line() -> String {
    "--cpu 2 --timeout 60s".to_string()
}

fn default_notifier_image() -> String {
    "send-event".to_string()
}

fn default_notifier_command_line() -> String {
    "/app/batchflow send-event".to_string()
}

fn default_event_type() -> String {
    "jobFinished".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/batchflow.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Batch Configuration
// ============================================================================

/// Batch service client and job layout configuration
///
/// The image names are joined to the registry address given on the command
/// line, so they carry no registry host of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// REST `api-version` query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_job_id_prefix")]
    pub job_id_prefix: String,

    #[serde(default = "default_primary_task_id_prefix")]
    pub primary_task_id_prefix: String,

    #[serde(default = "default_notifier_task_id_prefix")]
    pub notifier_task_id_prefix: String,

    /// Image run by the primary (workload) task
    #[serde(default = "default_primary_image")]
    pub primary_image: String,

    /// Command line passed to the primary task's container
    #[serde(default = "default_primary_command_line")]
    pub primary_command_line: String,

    /// Image run by the completion notifier task
    #[serde(default = "default_notifier_image")]
    pub notifier_image: String,

    /// Command line passed to the notifier task's container
    #[serde(default = "default_notifier_command_line")]
    pub notifier_command_line: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            request_timeout: default_request_timeout(),
            job_id_prefix: default_job_id_prefix(),
            primary_task_id_prefix: default_primary_task_id_prefix(),
            notifier_task_id_prefix: default_notifier_task_id_prefix(),
            primary_image: default_primary_image(),
            primary_command_line: default_primary_command_line(),
            notifier_image: default_notifier_image(),
            notifier_command_line: default_notifier_command_line(),
        }
    }
}

// ============================================================================
// Event Grid Configuration
// ============================================================================

/// Event ingestion endpoint configuration
///
/// The endpoint URL and key are not here: they travel to the notifier task
/// through its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventGridConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// `eventType` stamped on completion events
    #[serde(default = "default_event_type")]
    pub event_type: String,
}

impl Default for EventGridConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            event_type: default_event_type(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub event_grid: EventGridConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}
