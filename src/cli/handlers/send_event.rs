//! Send-event command handler
//!
//! Runs inside the notifier task: reads the endpoint, key and job id from the
//! task environment and posts the completion event.

use std::sync::Arc;

use crate::config::{NotifierConfig, Settings};
use crate::error::AppResult;
use crate::models::encode_batch;
use crate::services::{CompletionNotifier, EventGridProvider};

/// Handler for the send-event command
pub struct SendEventCommandHandler {
    config: Settings,
}

impl SendEventCommandHandler {
    /// Create a new send-event command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the send-event command
    ///
    /// # Errors
    /// - `Configuration` when a required variable is missing
    /// - `Delivery` when the endpoint is unreachable or rejects the event
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        let notifier_config = NotifierConfig::from_env()?;
        tracing::debug!(config = ?notifier_config, "Notifier configuration loaded");

        let body = self.run(&notifier_config, dry_run).await?;
        if dry_run {
            println!("{}", body);
        }
        Ok(())
    }

    /// Build the notifier for `notifier_config`
    pub fn notifier(&self, notifier_config: &NotifierConfig) -> CompletionNotifier {
        let provider = EventGridProvider::new(notifier_config, &self.config.event_grid);
        CompletionNotifier::new(Arc::new(provider), &notifier_config.job_id)
            .with_event_type(&self.config.event_grid.event_type)
    }

    /// Send the event (or only build it when `dry_run`) and return the body
    pub async fn run(&self, notifier_config: &NotifierConfig, dry_run: bool) -> AppResult<String> {
        let notifier = self.notifier(notifier_config);

        let event = if dry_run {
            tracing::info!(job_id = %notifier.job_id(), "Dry run: event not sent");
            notifier.build_event()
        } else {
            notifier.notify().await?.0
        };

        Ok(encode_batch(std::slice::from_ref(&event)).map_err(anyhow::Error::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use serde_json::Value;
    use std::sync::Mutex;

    type Inbox = Arc<Mutex<Vec<(Option<String>, String)>>>;

    async fn spawn_endpoint(status: StatusCode) -> (String, Inbox) {
        let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/api/events",
                post(move |State(inbox): State<Inbox>, headers: HeaderMap, body: String| async move {
                    let key = headers
                        .get("aeg-sas-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    inbox.lock().unwrap().push((key, body));
                    status
                }),
            )
            .with_state(inbox.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/api/events", addr), inbox)
    }

    #[tokio::test]
    async fn test_posts_event_for_job() {
        let (endpoint, inbox) = spawn_endpoint(StatusCode::OK).await;
        let config = NotifierConfig::new(&endpoint, "grid-key", "job-7").unwrap();
        let handler = SendEventCommandHandler::new(Settings::default());

        let body = handler.run(&config, false).await.unwrap();

        let received = inbox.lock().unwrap().clone();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0.as_deref(), Some("grid-key"));
        assert_eq!(received[0].1, body);
        assert!(body.contains(r#""subject":"job-7""#));

        let events: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(events.as_array().unwrap().len(), 1);
        assert_eq!(events[0]["eventType"], "jobFinished");
    }

    #[tokio::test]
    async fn test_dry_run_does_not_post() {
        let (endpoint, inbox) = spawn_endpoint(StatusCode::OK).await;
        let config = NotifierConfig::new(&endpoint, "grid-key", "job-7").unwrap();
        let mut settings = Settings::default();
        settings.event_grid.event_type = "jobCompleted".to_string();

        let body = SendEventCommandHandler::new(settings)
            .run(&config, true)
            .await
            .unwrap();

        assert!(inbox.lock().unwrap().is_empty());
        let events: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(events[0]["eventType"], "jobCompleted");
    }

    #[tokio::test]
    async fn test_rejected_event_is_delivery_error() {
        let (endpoint, _inbox) = spawn_endpoint(StatusCode::FORBIDDEN).await;
        let config = NotifierConfig::new(&endpoint, "wrong", "job-7").unwrap();

        let err = SendEventCommandHandler::new(Settings::default())
            .run(&config, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Delivery { status: Some(403), .. }));
    }
}
