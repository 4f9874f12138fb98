use thiserror::Error;

use crate::config::error::ConfigError;

/// Application-wide error type that represents all possible errors in the system.
///
/// Every failure propagates to the process boundary; nothing is retried or
/// recovered internally. The variants map onto the three ways a run can fail
/// (missing input, a rejected submission, a failed delivery) plus plan
/// validation and unexpected internal failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required input is missing or malformed
    #[error("Configuration error: {key}: {message}")]
    Configuration { key: String, message: String },

    /// The batch service rejected a job or task creation call
    #[error("Submission failed during {operation}: {message}")]
    Submission {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// The event endpoint could not be reached or answered with a non-2xx status
    #[error("Delivery to {endpoint} failed: {message}")]
    Delivery {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// A job plan violates one of its invariants
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status attached to a submission or delivery failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Submission { status, .. } | AppError::Delivery { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::ValidationError { field, message } => AppError::Configuration {
                key: field,
                message,
            },
            ConfigError::MissingValue(key) => AppError::Configuration {
                key,
                message: "value is required".to_string(),
            },
            other => AppError::Configuration {
                key: "config".to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation_error_keeps_field() {
        let err: AppError = ConfigError::validation("batch.api_version", "must not be empty").into();
        match err {
            AppError::Configuration { key, message } => {
                assert_eq!(key, "batch.api_version");
                assert_eq!(message, "must not be empty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_value_maps_to_configuration() {
        let err: AppError = ConfigError::MissingValue("GRID_KEY".to_string()).into();
        assert!(matches!(err, AppError::Configuration { ref key, .. } if key == "GRID_KEY"));
        assert!(err.to_string().contains("GRID_KEY"));
    }

    #[test]
    fn test_status_only_for_remote_failures() {
        let submission = AppError::Submission {
            operation: "create job".to_string(),
            status: Some(409),
            message: "JobExists".to_string(),
        };
        assert_eq!(submission.status(), Some(409));

        let delivery = AppError::Delivery {
            endpoint: "https://eg.example/api".to_string(),
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(delivery.status(), None);
        assert_eq!(AppError::validation("task.id", "duplicate").status(), None);
    }
}
