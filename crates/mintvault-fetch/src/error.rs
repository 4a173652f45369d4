//! Error types for off-chain fetching
//!
//! All of these are recoverable per-asset: one failed download or
//! metadata fetch never aborts the containing record.

/// Network and media acquisition failures
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Server answered with a non-success status
    #[error("http status {status}")]
    HttpStatus { status: u16 },

    /// Declared or transferred size exceeded the cap
    #[error("size limit exceeded: {limit} bytes")]
    SizeLimitExceeded { limit: u64 },

    /// URL could not be parsed
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level failure
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// Body was not valid JSON
    #[error("invalid json body: {0}")]
    Json(#[from] serde_json::Error),

    /// Local disk failure while persisting
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}

impl FetchError {
    /// Whether a retry could plausibly succeed
    ///
    /// Timeouts and 5xx responses are transient; 4xx, size violations
    /// and parse failures are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::HttpStatus { status } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_split() {
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::HttpStatus { status: 503 }.is_retryable());
        assert!(!FetchError::HttpStatus { status: 404 }.is_retryable());
        assert!(!FetchError::SizeLimitExceeded { limit: 100 }.is_retryable());
    }
}
