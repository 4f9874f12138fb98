//! Event Grid delivery provider.
//!
//! Posts a JSON array of events to a topic endpoint using the global
//! HTTP_CLIENT, authenticated with the topic's access key.

use super::provider::{DeliveryReceipt, NotificationProvider};
use crate::config::{EventGridConfig, NotifierConfig};
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::models::{NotificationEvent, encode_batch};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use std::time::{Duration, Instant};

/// Header carrying the topic access key
pub const SAS_KEY_HEADER: &str = "aeg-sas-key";

/// Event Grid provider
///
/// # Example
/// ```ignore
/// let config = NotifierConfig::from_env()?;
/// let provider = EventGridProvider::new(&config, &settings.event_grid);
/// let receipt = provider.send(&[event]).await?;
/// ```
pub struct EventGridProvider {
    endpoint: Url,
    key: String,
    timeout: Duration,
}

impl EventGridProvider {
    pub fn new(config: &NotifierConfig, settings: &EventGridConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            key: config.key.clone(),
            timeout: Duration::from_secs(settings.request_timeout),
        }
    }

    fn delivery_error(&self, status: Option<u16>, message: impl Into<String>) -> AppError {
        AppError::Delivery {
            endpoint: self.endpoint.to_string(),
            status,
            message: message.into(),
        }
    }
}

#[async_trait]
impl NotificationProvider for EventGridProvider {
    async fn send(&self, events: &[NotificationEvent]) -> AppResult<DeliveryReceipt> {
        let start = Instant::now();
        let body = encode_batch(events)
            .map_err(|e| self.delivery_error(None, format!("Failed to encode events: {}", e)))?;

        let response = HTTP_CLIENT
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(SAS_KEY_HEADER, &self.key)
            .body(body)
            .send()
            .await
            .map_err(|e| self.delivery_error(None, e.to_string()))?;

        let status = response.status();
        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match text.trim() {
                "" => format!("HTTP {}", status.as_u16()),
                text => format!("HTTP {}: {}", status.as_u16(), text),
            };
            return Err(self.delivery_error(Some(status.as_u16()), message));
        }

        Ok(DeliveryReceipt {
            status_code: status.as_u16(),
            event_count: events.len(),
            duration_ms,
        })
    }

    fn name(&self) -> &'static str {
        "event_grid"
    }

    fn destination(&self) -> String {
        self.endpoint.to_string()
    }

    async fn validate_config(&self) -> AppResult<()> {
        if self.key.trim().is_empty() {
            return Err(AppError::configuration(
                crate::config::inputs::GRID_KEY_VAR,
                "Access key must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JOB_FINISHED_EVENT;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Received {
        key: Option<String>,
        body: Value,
    }

    type Inbox = Arc<Mutex<Vec<Received>>>;

    async fn accept(State(inbox): State<Inbox>, headers: HeaderMap, body: String) -> StatusCode {
        inbox.lock().unwrap().push(Received {
            key: headers
                .get(SAS_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_str(&body).unwrap(),
        });
        StatusCode::OK
    }

    async fn spawn_endpoint() -> (String, Inbox) {
        let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/api/events", post(accept))
            .route("/api/unauthorized", post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }))
            .with_state(inbox.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), inbox)
    }

    fn provider(endpoint: &str, key: &str) -> EventGridProvider {
        let config = NotifierConfig::new(endpoint, key, "job-1").unwrap();
        EventGridProvider::new(&config, &EventGridConfig::default())
    }

    fn event() -> NotificationEvent {
        NotificationEvent::new(JOB_FINISHED_EVENT, "job-1", json!({"foo": "bar"}))
    }

    #[tokio::test]
    async fn test_send_posts_array_with_key() {
        let (base, inbox) = spawn_endpoint().await;
        let provider = provider(&format!("{}/api/events", base), "k1");

        let receipt = provider.send(&[event()]).await.unwrap();
        assert_eq!(receipt.status_code, 200);
        assert_eq!(receipt.event_count, 1);

        let received = inbox.lock().unwrap().clone();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].key.as_deref(), Some("k1"));
        let events = received[0].body.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["subject"], "job-1");
        assert_eq!(events[0]["eventType"], "jobFinished");
    }

    #[tokio::test]
    async fn test_non_success_status_is_delivery_error() {
        let (base, _inbox) = spawn_endpoint().await;
        let provider = provider(&format!("{}/api/unauthorized", base), "wrong");

        let err = provider.send(&[event()]).await.unwrap_err();
        match err {
            AppError::Delivery {
                status, message, ..
            } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "HTTP 401: bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_delivery_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/api/events", listener.local_addr().unwrap());
        drop(listener);

        let err = provider(&endpoint, "k1").send(&[event()]).await.unwrap_err();
        assert!(matches!(err, AppError::Delivery { status: None, .. }));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_validate_config_accepts_key() {
        let provider = provider("https://eg.example/api/events", "k1");
        assert!(provider.validate_config().await.is_ok());
        assert_eq!(provider.name(), "event_grid");
        assert_eq!(provider.destination(), "https://eg.example/api/events");
    }
}
