use std::sync::LazyLock;
use std::time::Duration;

/// `User-Agent` sent with every outgoing request
pub const USER_AGENT: &str = concat!("batchflow/", env!("CARGO_PKG_VERSION"));

/// Default bound on a whole request, overridden per request from settings
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Global HTTP client instance
///
/// Initialized lazily on first access and shared by the batch client and the
/// event provider. A process makes at most three requests, so the pool is
/// kept small. Each request still sets its own timeout from configuration;
/// the values here are the outer bounds.
///
/// # Example
/// ```ignore
/// use crate::external::client::HTTP_CLIENT;
///
/// let response = HTTP_CLIENT
///     .post("https://example.eventgrid.azure.net/api/events")
///     .header("aeg-sas-key", key)
///     .body(body)
///     .send()
///     .await?;
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});
