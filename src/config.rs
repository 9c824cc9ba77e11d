use std::time::Duration;

/// Configuration for the EDGAR client
#[derive(Debug, Clone)]
pub struct Config {
    /// User agent string for HTTP requests. The SEC requires an identifying
    /// contact string, e.g. "my_app/1.0 (me@example.com)".
    pub user_agent: String,
    /// Rate limit in requests per second
    pub rate_limit: u32,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Base URL for the EDGAR data API (companyfacts)
    pub data_url: String,
    /// Base URL for EDGAR files (ticker registry)
    pub files_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: "fundviz/0.1.0".to_string(),
            rate_limit: 10,
            timeout: Duration::from_secs(30),
            data_url: "https://data.sec.gov".to_string(),
            files_url: "https://www.sec.gov/files".to_string(),
        }
    }
}

impl Config {
    /// Creates a config with a custom user agent and defaults for everything else.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_data_url(mut self, data_url: impl Into<String>) -> Self {
        self.data_url = data_url.into();
        self
    }

    pub fn with_files_url(mut self, files_url: impl Into<String>) -> Self {
        self.files_url = files_url.into();
        self
    }
}
