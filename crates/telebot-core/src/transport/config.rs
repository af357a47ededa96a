//! Configuration types for the API client.

use std::time::Duration;

/// Default API host.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

// =============================================================================
// HTTP Client Config
// =============================================================================

/// Configuration for the HTTP API client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API base URL, without a trailing slash.
    pub api_url: String,
    /// Bot authentication token.
    pub token: String,
    /// Optional path prefix placed before `bot<token>`.
    pub prefix: String,
    /// Request timeout. Must exceed the long-poll timeout.
    pub timeout: Duration,
}

impl HttpClientConfig {
    /// Creates a config for the given token against the default host.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            prefix: String::new(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the path prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the request timeout duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of an API method: `<api_url>/<prefix>bot<token>/<method>`.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{}bot{}/{}", self.api_url, self.prefix, self.token, method)
    }

    /// URL of a downloadable file: `<api_url>/file/<prefix>bot<token>/<path>`.
    pub fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/{}bot{}/{}",
            self.api_url,
            self.prefix,
            self.token,
            file_path.trim_start_matches('/')
        )
    }
}

// =============================================================================
// Retry Config
// =============================================================================

/// Exponential backoff policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Consecutive failures tolerated before giving up.
    pub max_retries: u32,
    /// Delay after the first failure.
    pub initial_delay: Duration,
    /// Upper bound for any delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Returns the delay that follows `current`, saturating at `max_delay`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        let secs = current.as_secs_f64() * self.multiplier.max(1.0);
        Duration::try_from_secs_f64(secs).map_or(self.max_delay, |next| next.min(self.max_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_and_file_urls() {
        let config = HttpClientConfig::new("123:abc")
            .with_api_url("http://localhost:8081/")
            .with_prefix("test/");
        assert_eq!(
            config.method_url("getMe"),
            "http://localhost:8081/test/bot123:abc/getMe"
        );
        assert_eq!(
            config.file_url("/photos/file_1.jpg"),
            "http://localhost:8081/file/test/bot123:abc/photos/file_1.jpg"
        );
    }

    #[test]
    fn test_default_host() {
        let config = HttpClientConfig::new("t");
        assert_eq!(config.method_url("getUpdates"), "https://api.telegram.org/bott/getUpdates");
    }

    #[test]
    fn test_backoff_is_capped() {
        let retry = RetryConfig {
            max_delay: Duration::from_secs(3),
            ..RetryConfig::default()
        };
        let second = retry.next_delay(retry.initial_delay);
        assert_eq!(second, Duration::from_secs(2));
        assert_eq!(retry.next_delay(second), Duration::from_secs(3));
    }

    #[test]
    fn test_backoff_saturates_on_huge_multiplier() {
        for multiplier in [1e300, f64::INFINITY, f64::MAX] {
            let retry = RetryConfig {
                multiplier,
                ..RetryConfig::default()
            };
            assert_eq!(retry.next_delay(Duration::from_secs(1)), retry.max_delay);
            assert_eq!(retry.next_delay(Duration::MAX), retry.max_delay);
        }
    }
}
