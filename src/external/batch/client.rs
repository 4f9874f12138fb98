//! Batch REST client authenticated with the account's Shared Key.
//!
//! Sends requests through the global `HTTP_CLIENT`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use super::auth::{OCP_DATE_HEADER, SharedKeySigner, SigningRequest, format_ocp_date};
use super::service::BatchService;
use crate::config::{BatchConfig, BatchCredentials};
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::models::{JobSpec, TaskSpec};

/// Content type the batch REST API expects for JSON bodies
pub const BATCH_CONTENT_TYPE: &str = "application/json; odata=minimalmetadata";

/// Error body returned by the batch service on a rejected call
#[derive(Debug, Deserialize)]
struct BatchErrorBody {
    code: Option<String>,
    message: Option<BatchErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct BatchErrorMessage {
    value: Option<String>,
}

/// Batch service client
///
/// # Example
/// ```ignore
/// let credentials = BatchCredentials::from_env()?;
/// let client = AzureBatchClient::new(&credentials, &settings.batch)?;
/// client.create_job(&job).await?;
/// ```
pub struct AzureBatchClient {
    base_url: Url,
    signer: SharedKeySigner,
    api_version: String,
    timeout: Duration,
}

impl AzureBatchClient {
    pub fn new(credentials: &BatchCredentials, config: &BatchConfig) -> AppResult<Self> {
        Ok(Self {
            base_url: credentials.account_url.clone(),
            signer: SharedKeySigner::new(credentials)?,
            api_version: config.api_version.clone(),
            timeout: Duration::from_secs(config.request_timeout),
        })
    }

    /// Resolve `segments` below the account URL and append `api-version`
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::configuration(
                    crate::config::inputs::BATCH_ACCOUNT_URL_VAR,
                    format!("'{}' cannot be used as a base URL", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    /// Sign and POST a JSON body; any non-2xx status is a submission failure
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        operation: &str,
        url: Url,
        body: &T,
    ) -> AppResult<()> {
        let start = Instant::now();
        let payload = serde_json::to_vec(body).map_err(|e| AppError::Submission {
            operation: operation.to_string(),
            status: None,
            message: format!("Failed to encode request body: {}", e),
        })?;

        let ocp_date = format_ocp_date(Timestamp::now());
        let authorization = self.signer.authorization(&SigningRequest {
            method: Method::POST.as_str(),
            url: &url,
            content_type: BATCH_CONTENT_TYPE,
            content_length: payload.len(),
            ocp_date: &ocp_date,
        })?;

        let response = HTTP_CLIENT
            .post(url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, BATCH_CONTENT_TYPE)
            .header(OCP_DATE_HEADER, &ocp_date)
            .header(AUTHORIZATION, authorization)
            .body(payload)
            .send()
            .await
            .map_err(|e| AppError::Submission {
                operation: operation.to_string(),
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!(
            operation,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch service responded"
        );

        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(AppError::Submission {
            operation: operation.to_string(),
            status: Some(status.as_u16()),
            message: describe_failure(status.as_u16(), &text),
        })
    }
}

/// `{code}: {message}` from a service error body, or the raw text
fn describe_failure(status: u16, text: &str) -> String {
    match serde_json::from_str::<BatchErrorBody>(text) {
        Ok(BatchErrorBody {
            code: Some(code),
            message,
        }) => match message.and_then(|m| m.value) {
            Some(value) => format!("{}: {}", code, value),
            None => code,
        },
        _ if text.trim().is_empty() => format!("HTTP {}", status),
        _ => format!("HTTP {}: {}", status, text.trim()),
    }
}

#[async_trait]
impl BatchService for AzureBatchClient {
    async fn create_job(&self, job: &JobSpec) -> AppResult<()> {
        let url = self.endpoint(&["jobs"])?;
        self.post_json("create job", url, job).await
    }

    async fn add_task(&self, job_id: &str, task: &TaskSpec) -> AppResult<()> {
        let url = self.endpoint(&["jobs", job_id, "tasks"])?;
        self.post_json("add task", url, task).await
    }
}
