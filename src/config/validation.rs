//! Configuration validation logic

use crate::config::error::ConfigError;
use crate::config::settings::{BatchConfig, EventGridConfig, FileSettings, LoggerSettings, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

fn require_non_blank(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: "Value cannot be empty.".to_string(),
        });
    }
    Ok(())
}

impl BatchConfig {
    /// Validate batch configuration
    ///
    /// # Validation Rules
    /// - API version, id prefixes, images and command lines must not be blank
    /// - Request timeout must be greater than 0
    /// - Image names are relative to the registry and must not start with `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_blank("batch.api_version", &self.api_version)?;

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "batch.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        require_non_blank("batch.job_id_prefix", &self.job_id_prefix)?;
        require_non_blank("batch.primary_task_id_prefix", &self.primary_task_id_prefix)?;
        require_non_blank("batch.notifier_task_id_prefix", &self.notifier_task_id_prefix)?;

        if self.primary_task_id_prefix == self.notifier_task_id_prefix {
            return Err(ConfigError::validation(
                "batch.notifier_task_id_prefix",
                "Primary and notifier task id prefixes must differ.",
            ));
        }

        for (field, image) in [
            ("batch.primary_image", &self.primary_image),
            ("batch.notifier_image", &self.notifier_image),
        ] {
            require_non_blank(field, image)?;
            if image.starts_with('/') {
                return Err(ConfigError::ValidationError {
                    field: field.to_string(),
                    message: format!(
                        "Image name '{}' must be relative to the registry address.",
                        image
                    ),
                });
            }
        }

        require_non_blank("batch.primary_command_line", &self.primary_command_line)?;
        require_non_blank("batch.notifier_command_line", &self.notifier_command_line)?;

        Ok(())
    }
}

impl EventGridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "event_grid.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }
        require_non_blank("event_grid.event_type", &self.event_type)
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all sections, returning the first error encountered
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.batch.validate()?;
        self.event_grid.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
