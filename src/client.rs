use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::config::Config;
use super::error::{FundvizError, Result};

const MAX_RETRIES: u32 = 5;
const INITIAL_BACKOFF_MS: u64 = 1000; // 1 second

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Rate-limited HTTP client for the SEC EDGAR endpoints this crate uses.
///
/// The SEC's fair access policy caps automated traffic at 10 requests per second,
/// so every request first waits on a token-bucket rate limiter. Transient failures
/// and 429 responses are retried with exponential backoff and jitter; 404 and other
/// HTTP errors are returned immediately.
///
/// The client sends the configured user agent with every request. The SEC requires
/// a real contact string here and will block anonymous traffic, so pass something
/// like `"my_app/1.0 (me@example.com)"`.
///
/// # Examples
///
/// ```rust
/// # use fundviz::EdgarClient;
/// let client = EdgarClient::new("my_app/1.0 (my@email.com)")?;
/// # Ok::<(), fundviz::FundvizError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EdgarClient {
    /// HTTP client for making requests
    pub(crate) client: reqwest::Client,

    /// Token bucket rate limiter for SEC compliance
    pub(crate) rate_limiter: Arc<Governor>,

    /// Base URL for the EDGAR data API
    pub(crate) data_url: String,

    /// Base URL for EDGAR files
    pub(crate) files_url: String,
}

impl EdgarClient {
    /// Creates a client with the default rate limit (10/s), a 30-second timeout and
    /// the standard SEC.gov base URLs.
    ///
    /// # Errors
    ///
    /// Returns `FundvizError::ConfigError` if the user agent is not a valid header
    /// value or the underlying HTTP client cannot be built.
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_config(Config::new(user_agent))
    }

    /// Creates a client from an explicit [`Config`].
    ///
    /// Useful for pointing the client at a mock server in tests or adjusting the
    /// rate limit and timeout.
    pub fn with_config(config: Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FundvizError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                FundvizError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(config.rate_limit).ok_or_else(|| {
                FundvizError::ConfigError("Rate limit must be greater than zero".to_string())
            })?,
        )));

        Ok(EdgarClient {
            client,
            rate_limiter,
            data_url: config.data_url,
            files_url: config.files_url,
        })
    }

    /// Wait duration before the next retry: `(2^retry × 1000ms) ± 20%` jitter.
    fn calculate_backoff(retry: u32) -> Duration {
        let backoff_ms = INITIAL_BACKOFF_MS * (2_u64.pow(retry));
        // Add some jitter (±20% of the calculated backoff)
        let jitter = (backoff_ms as f64 * 0.2 * (fastrand::f64() - 0.5)) as i64;
        Duration::from_millis((backoff_ms as i64 + jitter) as u64)
    }

    /// Fetches text content from a URL with rate limiting and retries.
    ///
    /// For URLs ending in `.json` the response is sanity-checked: the SEC sometimes
    /// serves error pages with a 200 status, and sometimes serves valid JSON with a
    /// `text/html` content type. A body that is actually HTML produces an
    /// [`FundvizError::UnexpectedContentType`] with a preview for debugging.
    ///
    /// Rate limit responses (429) are retried up to 5 times, honoring a
    /// `Retry-After` header when present; network errors use exponential backoff.
    /// 404 maps to [`FundvizError::NotFound`] without retry.
    pub async fn get(&self, url: &str) -> Result<String> {
        let mut retries = 0;

        loop {
            // Wait for rate limiter
            self.rate_limiter.until_ready().await;

            let response_result = self.client.get(url).send().await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    let headers = response.headers().clone();

                    if url.ends_with(".json") && status.is_success() {
                        if let Some(ct) = headers
                            .get(reqwest::header::CONTENT_TYPE)
                            .and_then(|val| val.to_str().ok())
                        {
                            if ct.to_lowercase().contains("text/html") {
                                // SEC sometimes returns JSON with text/html content-type.
                                // Check whether the body is actually JSON before failing.
                                let body_text = response
                                    .text()
                                    .await
                                    .unwrap_or_else(|_| "Failed to read response body".to_string());

                                if body_text.trim_start().starts_with('{')
                                    || body_text.trim_start().starts_with('[')
                                {
                                    tracing::warn!(
                                        "Received text/html content-type for .json URL, but content appears to be JSON: {}",
                                        url
                                    );
                                    return Ok(body_text);
                                }

                                let body_preview = body_text.chars().take(200).collect::<String>();
                                return Err(FundvizError::UnexpectedContentType {
                                    url: url.to_string(),
                                    expected_pattern: "application/json".to_string(),
                                    got_content_type: ct.to_string(),
                                    content_preview: body_preview,
                                });
                            }
                        }
                    }

                    match status {
                        reqwest::StatusCode::OK => {
                            return response.text().await.map_err(FundvizError::RequestError);
                        }
                        reqwest::StatusCode::NOT_FOUND => {
                            return Err(FundvizError::NotFound);
                        }
                        reqwest::StatusCode::TOO_MANY_REQUESTS => {
                            if retries >= MAX_RETRIES {
                                return Err(FundvizError::RateLimitExceeded);
                            }

                            let retry_after_duration = headers
                                .get("retry-after")
                                .and_then(|h| h.to_str().ok())
                                .and_then(|s| s.parse::<u64>().ok())
                                .map(Duration::from_secs)
                                .unwrap_or_else(|| Self::calculate_backoff(retries));

                            tracing::warn!(
                                "Rate limit hit (429) for {}. Attempt {}/{}. Waiting for {:?} before retry.",
                                url,
                                retries + 1,
                                MAX_RETRIES + 1,
                                retry_after_duration
                            );
                            sleep(retry_after_duration).await;
                            retries += 1;
                            continue;
                        }
                        other_status => {
                            let error_body = response
                                .text()
                                .await
                                .unwrap_or_else(|_| "Failed to read error body".to_string());

                            return Err(FundvizError::InvalidResponse(format!(
                                "Unexpected status code: {} for URL: {}. Response preview: {}",
                                other_status,
                                url,
                                error_body.chars().take(200).collect::<String>()
                            )));
                        }
                    }
                }
                Err(e) => {
                    // Network or other reqwest error before getting a response status
                    if retries >= MAX_RETRIES {
                        return Err(FundvizError::RequestError(e));
                    }
                    let backoff_duration = Self::calculate_backoff(retries);
                    tracing::warn!(
                        "Request failed for {}: {:?}. Attempt {}/{}. Retrying in {:?}.",
                        url,
                        e,
                        retries + 1,
                        MAX_RETRIES + 1,
                        backoff_duration
                    );
                    sleep(backoff_duration).await;
                    retries += 1;
                    continue;
                }
            }
        }
    }

    /// Returns the base URL for the EDGAR data API.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Returns the base URL for EDGAR files.
    pub fn files_url(&self) -> &str {
        &self.files_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff() {
        let backoff0 = EdgarClient::calculate_backoff(0);
        let backoff1 = EdgarClient::calculate_backoff(1);
        let backoff2 = EdgarClient::calculate_backoff(2);

        // Check that backoff increases exponentially
        assert!(backoff0 < backoff1);
        assert!(backoff1 < backoff2);

        // Check that backoff is roughly within expected range
        assert!(backoff0.as_millis() >= 800 && backoff0.as_millis() <= 1200); // ±20% of 1000ms
        assert!(backoff1.as_millis() >= 1600 && backoff1.as_millis() <= 2400); // ±20% of 2000ms
        assert!(backoff2.as_millis() >= 3200 && backoff2.as_millis() <= 4800); // ±20% of 4000ms
    }

    #[test]
    fn test_rejects_zero_rate_limit() {
        let config = Config::new("test_agent").with_rate_limit(0);
        let result = EdgarClient::with_config(config);
        assert!(matches!(result, Err(FundvizError::ConfigError(_))));
    }
}
