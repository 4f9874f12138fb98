//! Core notification provider trait and types.
//!
//! A provider delivers a batch of completion events to one ingestion endpoint.

use crate::error::AppResult;
use crate::models::NotificationEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// HTTP status code returned by the endpoint
    pub status_code: u16,
    /// Number of events in the delivered batch
    pub event_count: usize,
    /// Time taken for the request in milliseconds
    pub duration_ms: u64,
}

/// Trait for event delivery providers
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// A provider makes exactly one attempt per call; an unreachable endpoint or
/// a non-2xx answer is returned as `AppError::Delivery`.
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// pub struct EventGridProvider {
///     endpoint: Url,
///     key: String,
/// }
///
/// #[async_trait]
/// impl NotificationProvider for EventGridProvider {
///     async fn send(&self, events: &[NotificationEvent]) -> AppResult<DeliveryReceipt> {
///         // Implementation here
///     }
///
///     fn name(&self) -> &'static str {
///         "event_grid"
///     }
/// }
/// ```
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Deliver a batch of events in one request
    async fn send(&self, events: &[NotificationEvent]) -> AppResult<DeliveryReceipt>;

    /// Returns the provider name for logging
    fn name(&self) -> &'static str;

    /// Human readable destination, used in logs and dry runs
    fn destination(&self) -> String;

    /// Validates provider configuration (optional, default no-op)
    async fn validate_config(&self) -> AppResult<()> {
        Ok(())
    }
}
