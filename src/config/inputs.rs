//! Runtime inputs gathered once at process start
//!
//! Credentials and endpoints come from the command line and the process
//! environment. They are read here, validated, and then handed to the
//! components as plain values; nothing below this layer looks at the
//! environment.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;

use crate::config::error::ConfigError;

pub const BATCH_ACCOUNT_NAME_VAR: &str = "BATCH_ACCOUNT_NAME";
pub const BATCH_ACCOUNT_KEY_VAR: &str = "BATCH_ACCOUNT_KEY";
pub const BATCH_ACCOUNT_URL_VAR: &str = "BATCH_ACCOUNT_URL";

pub const GRID_ENDPOINT_VAR: &str = "GRID_ENDPOINT";
pub const GRID_KEY_VAR: &str = "GRID_KEY";
/// Set by the batch scheduler on every task it launches
pub const JOB_ID_VAR: &str = "AZ_BATCH_JOB_ID";

fn required(key: &str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::missing(key)),
    }
}

fn parse_http_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::ValidationError {
        field: key.to_string(),
        message: format!("Invalid URL '{}': {}", value, e),
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::ValidationError {
            field: key.to_string(),
            message: "URL must use http or https protocol".to_string(),
        });
    }

    Ok(url)
}

// ============================================================================
// Submit inputs
// ============================================================================

/// The four positional inputs of `batchflow submit`
#[derive(Clone, PartialEq, Eq)]
pub struct SubmitInputs {
    pub pool_id: String,
    /// Registry host (and optional namespace), without a trailing `/`
    pub registry: String,
    pub event_endpoint: Url,
    pub event_key: String,
}

impl SubmitInputs {
    /// Validate the caller-supplied values
    ///
    /// # Errors
    /// `MissingValue` for a blank value, `ValidationError` for an endpoint that
    /// is not an http(s) URL.
    pub fn new(
        pool_id: impl Into<String>,
        registry: impl Into<String>,
        event_endpoint: impl Into<String>,
        event_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let pool_id = required("pool-name", Some(pool_id.into()))?;
        let registry = required("registry-address", Some(registry.into()))?;
        let endpoint = required("event-grid-endpoint", Some(event_endpoint.into()))?;
        let event_key = required("event-grid-key", Some(event_key.into()))?;

        let registry = registry.trim_end_matches('/').to_string();
        if registry.is_empty() {
            return Err(ConfigError::missing("registry-address"));
        }

        Ok(Self {
            pool_id,
            registry,
            event_endpoint: parse_http_url("event-grid-endpoint", &endpoint)?,
            event_key,
        })
    }

    /// Full image reference for an image name relative to the registry
    pub fn image(&self, name: &str) -> String {
        format!("{}/{}", self.registry, name.trim_start_matches('/'))
    }
}

impl fmt::Debug for SubmitInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitInputs")
            .field("pool_id", &self.pool_id)
            .field("registry", &self.registry)
            .field("event_endpoint", &self.event_endpoint.as_str())
            .field("event_key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Batch credentials
// ============================================================================

/// Shared Key credentials for the batch account
#[derive(Clone, PartialEq, Eq)]
pub struct BatchCredentials {
    pub account_name: String,
    /// Base64 encoded account key
    pub account_key: String,
    pub account_url: Url,
}

impl BatchCredentials {
    pub fn new(
        account_name: impl Into<String>,
        account_key: impl Into<String>,
        account_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let (name, key, url) = (account_name.into(), account_key.into(), account_url.into());
        Self::from_lookup(|var| match var {
            BATCH_ACCOUNT_NAME_VAR => Some(name.clone()),
            BATCH_ACCOUNT_KEY_VAR => Some(key.clone()),
            BATCH_ACCOUNT_URL_VAR => Some(url.clone()),
            _ => None,
        })
    }

    /// Read `BATCH_ACCOUNT_NAME`, `BATCH_ACCOUNT_KEY` and `BATCH_ACCOUNT_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let account_name = required(BATCH_ACCOUNT_NAME_VAR, lookup(BATCH_ACCOUNT_NAME_VAR))?;
        let account_key = required(BATCH_ACCOUNT_KEY_VAR, lookup(BATCH_ACCOUNT_KEY_VAR))?;
        let account_url = required(BATCH_ACCOUNT_URL_VAR, lookup(BATCH_ACCOUNT_URL_VAR))?;

        if STANDARD.decode(&account_key).is_err() {
            return Err(ConfigError::validation(
                BATCH_ACCOUNT_KEY_VAR,
                "Account key must be base64 encoded",
            ));
        }

        Ok(Self {
            account_name,
            account_key,
            account_url: parse_http_url(BATCH_ACCOUNT_URL_VAR, &account_url)?,
        })
    }
}

impl fmt::Debug for BatchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchCredentials")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .field("account_url", &self.account_url.as_str())
            .finish()
    }
}

// ============================================================================
// Notifier configuration
// ============================================================================

/// Inputs of the completion notifier, injected into the task environment
#[derive(Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub endpoint: Url,
    pub key: String,
    pub job_id: String,
}

impl NotifierConfig {
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        job_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let (endpoint, key, job_id) = (endpoint.into(), key.into(), job_id.into());
        Self::from_lookup(|var| match var {
            GRID_ENDPOINT_VAR => Some(endpoint.clone()),
            GRID_KEY_VAR => Some(key.clone()),
            JOB_ID_VAR => Some(job_id.clone()),
            _ => None,
        })
    }

    /// Read `GRID_ENDPOINT`, `GRID_KEY` and `AZ_BATCH_JOB_ID`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let endpoint = required(GRID_ENDPOINT_VAR, lookup(GRID_ENDPOINT_VAR))?;
        let key = required(GRID_KEY_VAR, lookup(GRID_KEY_VAR))?;
        let job_id = required(JOB_ID_VAR, lookup(JOB_ID_VAR))?;

        Ok(Self {
            endpoint: parse_http_url(GRID_ENDPOINT_VAR, &endpoint)?,
            key,
            job_id,
        })
    }
}

impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("key", &"<redacted>")
            .field("job_id", &self.job_id)
            .finish()
    }
}
