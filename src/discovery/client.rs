//! Resilient JSON-over-HTTP fetch client shared by the provider lookups.
//!
//! Three behaviors the raw reqwest client doesn't give us:
//! - **In-flight de-duplication**: identical concurrent requests (same URL)
//!   share one pending future, so parallel resolver runs never issue duplicate
//!   network calls. The map is owned by the client instance and self-clears as
//!   requests complete.
//! - **Retry with backoff**: 5xx and 429 responses are retried a small fixed
//!   number of times with exponential backoff. Other 4xx are never retried.
//! - **Distinct error kinds**: timeouts, transport failures, rate limits and
//!   limiter rejections each map to their own [`FetchError`] variant so
//!   callers can triage without string matching.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Errors from the fetch layer.
///
/// Clone is required so de-duplicated waiters can each receive the result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0}: {1}")]
    Status(u16, String),

    #[error("rate limited - try again later")]
    RateLimited,

    #[error("request limiter rejected the request: {0}")]
    Limiter(String),

    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl FetchError {
    /// 5xx and 429 are worth one more attempt; everything else is not.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::RateLimited => true,
            FetchError::Status(code, _) => (500..=599).contains(code),
            _ => false,
        }
    }
}

/// Injected request pacing. Failures propagate as [`FetchError::Limiter`].
#[async_trait]
pub trait RequestLimiter: Send + Sync {
    async fn acquire(&self) -> Result<(), LimiterError>;
}

/// A limiter rejected or failed a request.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct LimiterError(pub String);

/// Enforces a minimum interval between requests by sleeping.
pub struct IntervalLimiter {
    last_request: tokio::sync::Mutex<Option<std::time::Instant>>,
    min_interval: Duration,
}

impl IntervalLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: tokio::sync::Mutex::new(None),
            min_interval,
        }
    }
}

#[async_trait]
impl RequestLimiter for IntervalLimiter {
    async fn acquire(&self) -> Result<(), LimiterError> {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(std::time::Instant::now());
        Ok(())
    }
}

type FetchResult = Result<Arc<Value>, FetchError>;
type PendingFetch = Shared<BoxFuture<'static, FetchResult>>;

/// User agent string sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Initial retry backoff; doubles per attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// JSON fetcher with timeout, retry and in-flight de-duplication.
pub struct FetchClient {
    http: reqwest::Client,
    in_flight: Mutex<HashMap<String, PendingFetch>>,
    timeout: Duration,
    max_retries: u32,
    limiter: Option<Arc<dyn RequestLimiter>>,
}

impl FetchClient {
    /// Create a client with the given per-request timeout and retry budget.
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        let http = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            in_flight: Mutex::new(HashMap::new()),
            timeout,
            max_retries,
            limiter: None,
        }
    }

    /// Attach a request limiter. Limiter failures surface as
    /// [`FetchError::Limiter`].
    pub fn with_limiter(mut self, limiter: Arc<dyn RequestLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Fetch a URL and parse the body as JSON.
    ///
    /// Concurrent calls for the same URL share one network request.
    pub async fn get_json(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<Arc<Value>, FetchError> {
        let key = url.to_string();

        let pending = {
            let mut in_flight = self.in_flight.lock().expect("in-flight map poisoned");
            if let Some(existing) = in_flight.get(&key) {
                tracing::debug!(url = %url, "Joining in-flight request");
                existing.clone()
            } else {
                let fut = fetch_with_retry(
                    self.http.clone(),
                    key.clone(),
                    headers.to_vec(),
                    self.timeout,
                    self.max_retries,
                    self.limiter.clone(),
                )
                .boxed()
                .shared();
                in_flight.insert(key.clone(), fut.clone());
                fut
            }
        };

        let result = pending.clone().await;

        // Self-clearing: the key only lives as long as the request. Guarded by
        // pointer equality so a slow waiter cannot evict a newer in-flight
        // entry that reused the same URL.
        let mut in_flight = self.in_flight.lock().expect("in-flight map poisoned");
        if in_flight
            .get(&key)
            .is_some_and(|current| current.ptr_eq(&pending))
        {
            in_flight.remove(&key);
        }

        result
    }

    /// Fetch a URL and deserialize the JSON body into `T`.
    pub async fn get_json_as<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        let value = self.get_json(url, headers).await?;
        serde_json::from_value((*value).clone()).map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Number of requests currently in flight (for diagnostics).
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().expect("in-flight map poisoned").len()
    }
}

async fn fetch_with_retry(
    http: reqwest::Client,
    url: String,
    headers: Vec<(&'static str, String)>,
    timeout: Duration,
    max_retries: u32,
    limiter: Option<Arc<dyn RequestLimiter>>,
) -> FetchResult {
    if let Some(limiter) = &limiter {
        limiter
            .acquire()
            .await
            .map_err(|e| FetchError::Limiter(e.to_string()))?;
    }

    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match fetch_once(&http, &url, &headers, timeout).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt <= max_retries => {
                tracing::warn!(
                    url = %url,
                    attempt,
                    error = %err,
                    backoff_ms = backoff.as_millis() as u64,
                    "Transient HTTP failure, will retry after backoff"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn fetch_once(
    http: &reqwest::Client,
    url: &str,
    headers: &[(&'static str, String)],
    timeout: Duration,
) -> FetchResult {
    let mut request = http.get(url).timeout(timeout);
    for (name, value) in headers {
        request = request.header(*name, value);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e.to_string())
        }
    })?;

    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::Status(
            status.as_u16(),
            body.chars().take(200).collect::<String>(),
        ));
    }

    let value = response.json::<Value>().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Parse(e.to_string())
        }
    })?;

    Ok(Arc::new(value))
}
