//! Error types for the Review Engine.

use thiserror::Error;

/// Result type alias for Review Engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Review Engine.
#[derive(Error, Debug)]
pub enum Error {
    // ===== Provider Errors =====
    #[error("Provider error: {status} {status_text} - {message}")]
    Provider {
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Provider quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    // ===== Pipeline Errors =====
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    // ===== Integration Errors =====
    #[error("GitLab API error: {status} - {message}")]
    GitLab { status: u16, message: String },

    // ===== I/O Errors =====
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== HTTP Errors =====
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP server error: {0}")]
    HttpServer(String),

    // ===== Internal Errors =====
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a provider error from HTTP response details.
    ///
    /// Rate-limit (429) and quota (402/403) statuses are mapped onto their
    /// dedicated variants so the retry policy can classify them directly.
    pub fn provider(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => Self::RateLimited(message),
            402 | 403 => Self::QuotaExhausted(message),
            _ => Self::Provider {
                status,
                status_text: status_text.into(),
                message,
            },
        }
    }

    /// Check if this error is a rate-limit signal (retry the same model).
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Provider { status, .. } => *status == 429 || *status == 529,
            _ => false,
        }
    }

    /// Check if this error signals exhausted quota or a permanent rejection
    /// (skip remaining retries, fall back to the secondary model).
    pub fn is_quota(&self) -> bool {
        match self {
            Self::QuotaExhausted(_) => true,
            Self::Provider { status, .. } => *status == 402 || *status == 403,
            _ => false,
        }
    }
}
