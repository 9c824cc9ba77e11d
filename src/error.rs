use thiserror::Error;

#[derive(Error, Debug)]
pub enum FundvizError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Ticker not found")]
    TickerNotFound,

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No data for concept '{concept}' in unit '{unit}'")]
    DataAbsent { concept: String, unit: String },

    #[error("No overlapping periods between '{left}' and '{right}'")]
    NoOverlap { left: String, right: String },

    #[error("Chart rendering failed: {0}")]
    ChartError(String),

    #[error(
        "Unexpected content type from URL {url}. Expected pattern {expected_pattern}, but got Content-Type: {got_content_type}. Content preview: {content_preview}..."
    )]
    UnexpectedContentType {
        url: String,
        expected_pattern: String, // e.g., "application/json"
        got_content_type: String,
        content_preview: String,
    },
}

pub type Result<T> = std::result::Result<T, FundvizError>;
