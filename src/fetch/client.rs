//! The stateful page fetcher: one HTTP session, one retry policy, one set of
//! run counters.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method};
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::constants::{
    ACCEPT_HTML, ACCEPT_LANGUAGE_EN, CONNECT_TIMEOUT_SECS, FORM_CONTENT_TYPE, READ_TIMEOUT_SECS,
};
use super::error::FetchError;
use super::retry::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy,
    classify_error,
};
use super::stats::{RunStats, StatsSnapshot};
use super::throttle::{DEFAULT_RATE_LIMIT_WAIT, RequestThrottle, rate_limit_wait};
use crate::user_agent;

/// Backoff cap used by [`FetchConfig::retry_policy`].
const MAX_BACKOFF: Duration = Duration::from_secs(32);

/// Settings for one [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Attempts per fetch, including the first. Rate-limit waits do not count.
    pub max_attempts: u32,
    /// Courtesy pause before every attempt.
    pub request_delay: Duration,
    /// Backoff after the first failed attempt; doubles per attempt.
    pub backoff_base: Duration,
    /// Wait after a 429 without a usable Retry-After header.
    pub rate_limit_fallback: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub read_timeout: Duration,
    /// Overrides the default tool User-Agent.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            request_delay: Duration::ZERO,
            backoff_base: DEFAULT_BASE_DELAY,
            rate_limit_fallback: DEFAULT_RATE_LIMIT_WAIT,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl FetchConfig {
    /// Builds the retry policy these settings describe.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff_base, MAX_BACKOFF)
    }
}

/// A successfully fetched page.
///
/// The fetcher knows nothing about HTML; callers parse `body` themselves.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    /// HTTP status of the response (always 2xx).
    pub status: u16,
    /// Decoded response body.
    pub body: String,
}

/// Fetches tracker pages with bounded retry, exponential backoff and
/// rate-limit-aware waiting.
///
/// One fetcher is created per run and shared by reference with the list
/// walker and detail pipeline. It owns the HTTP session (connection pool,
/// cookies, default headers) and the run's [`RunStats`].
///
/// # Example
///
/// ```no_run
/// use tracker_core::fetch::{FetchConfig, Fetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = Fetcher::new(&FetchConfig::default())?;
/// let page = fetcher.get("https://tracker.example/ProjectList.aspx?ClientId=36-67").await?;
/// println!("{} bytes, {:?}", page.body.len(), fetcher.stats());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    throttle: RequestThrottle,
    rate_limit_fallback: Duration,
    stats: RunStats,
}

impl Fetcher {
    /// Creates a fetcher with a fresh HTTP session and zeroed statistics.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be built.
    #[instrument(level = "debug", skip(config), fields(max_attempts = config.max_attempts))]
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = build_client(config).map_err(|source| FetchError::ClientBuild { source })?;

        debug!(
            request_delay_ms = config.request_delay.as_millis(),
            backoff_base_ms = config.backoff_base.as_millis(),
            rate_limit_fallback_secs = config.rate_limit_fallback.as_secs(),
            "creating fetcher"
        );

        Ok(Self {
            client,
            policy: config.retry_policy(),
            throttle: RequestThrottle::new(config.request_delay),
            rate_limit_fallback: config.rate_limit_fallback,
            stats: RunStats::new(),
        })
    }

    /// Returns the retry policy in use.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns a snapshot of the run statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Fetches `url` with GET.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn get(&self, url: &str) -> Result<Page, FetchError> {
        self.fetch(url, Method::GET, None).await
    }

    /// Fetches `url`, retrying transient failures and waiting out rate limits.
    ///
    /// - A courtesy delay (if configured) precedes every attempt.
    /// - HTTP 429 sleeps for the server's Retry-After (or the fallback wait)
    ///   and retries without consuming an attempt.
    /// - Transient failures back off `base * 2^(n-1)` after failed attempt `n`.
    /// - Permanent failures stop immediately.
    ///
    /// Exactly one of the success or failure counters moves per call.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] for unparseable URLs (nothing is
    /// sent), otherwise [`FetchError::Terminal`] wrapping the last attempt's
    /// error once no further attempt is allowed.
    #[instrument(skip(self, form), fields(url = %url, method = %method))]
    pub async fn fetch(
        &self,
        url: &str,
        method: Method,
        form: Option<&[(&str, &str)]>,
    ) -> Result<Page, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(url));
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let error = loop {
                self.throttle.before_attempt().await;
                self.stats.record_request();
                debug!(attempt, "sending request");

                match self.send_once(url, &method, form).await {
                    Ok(page) => {
                        self.stats.record_success();
                        return Ok(page);
                    }
                    Err(error) if classify_error(&error) == FailureType::RateLimited => {
                        let wait = rate_limit_wait(&error, self.rate_limit_fallback);
                        warn!(
                            attempt,
                            wait_secs = wait.as_secs(),
                            "rate limited, waiting before retrying"
                        );
                        self.stats.record_rate_limit_wait();
                        self.throttle.wait_rate_limit(wait).await;
                    }
                    Err(error) => break error,
                }
            };

            match self.policy.should_retry(classify_error(&error), attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    warn!(
                        attempt = next_attempt,
                        max_attempts = self.policy.max_attempts(),
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "request failed, retrying"
                    );
                    self.stats.record_retry();
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::DoNotRetry { reason } => {
                    self.stats.record_failure();
                    error!(attempts = attempt, %reason, error = %error, "request failed");
                    return Err(FetchError::terminal(url, attempt, error));
                }
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        method: &Method,
        form: Option<&[(&str, &str)]>,
    ) -> Result<Page, FetchError> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(pairs) = form {
            let body = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().copied())
                .finish();
            request = request.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = request.send().await.map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(std::string::ToString::to_string);
            return Err(FetchError::http_status_with_retry_after(
                url,
                status.as_u16(),
                retry_after,
            ));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        debug!(status = status.as_u16(), bytes = body.len(), "fetched page");

        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}

fn classify_send_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout(url)
    } else {
        FetchError::network(url, error)
    }
}

fn build_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(user_agent::default_user_agent);

    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.read_timeout)
        .gzip(true)
        .cookie_store(true)
        .default_headers(headers)
        .user_agent(user_agent)
        .build()
}
