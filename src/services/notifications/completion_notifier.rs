//! Completion notifier: reports a finished job as a single event.

use std::sync::Arc;

use serde_json::{Value as JsonValue, json};

use super::provider::{DeliveryReceipt, NotificationProvider};
use crate::error::AppResult;
use crate::models::{JOB_FINISHED_EVENT, NotificationEvent};

/// Builds the completion event for one job and hands it to a provider
pub struct CompletionNotifier {
    provider: Arc<dyn NotificationProvider>,
    job_id: String,
    event_type: String,
    payload: JsonValue,
}

impl CompletionNotifier {
    /// Notifier for `job_id` with the `jobFinished` event type and the
    /// placeholder payload
    pub fn new(provider: Arc<dyn NotificationProvider>, job_id: impl Into<String>) -> Self {
        Self {
            provider,
            job_id: job_id.into(),
            event_type: JOB_FINISHED_EVENT.to_string(),
            payload: json!({"foo": "bar"}),
        }
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Replace the placeholder `data` payload
    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload = payload;
        self
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// A fresh event stamped with the current time
    pub fn build_event(&self) -> NotificationEvent {
        NotificationEvent::new(&self.event_type, &self.job_id, self.payload.clone())
    }

    /// Build one event and deliver it as a single-element batch
    pub async fn notify(&self) -> AppResult<(NotificationEvent, DeliveryReceipt)> {
        self.provider.validate_config().await?;

        let event = self.build_event();
        tracing::info!(
            job_id = %self.job_id,
            event_id = %event.id,
            provider = self.provider.name(),
            destination = %self.provider.destination(),
            "Sending completion event"
        );

        let receipt = self.provider.send(std::slice::from_ref(&event)).await?;
        tracing::info!(
            job_id = %self.job_id,
            status = receipt.status_code,
            duration_ms = receipt.duration_ms,
            "Completion event delivered"
        );

        Ok((event, receipt))
    }
}
