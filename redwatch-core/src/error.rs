use std::time::Duration;
use thiserror::Error;

/// Top-level error for the redwatch binary.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal at startup; the monitor loop never runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}. Fill in the generated template and run again")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Placeholder Reddit credentials in config; replace them with real ones")]
    PlaceholderCredentials,
}

/// Errors raised by the feed subscription. Fatal at loop level: the
/// subscription is not restartable within a run.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Reddit authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Subreddit not found: {subreddit}")]
    SubredditNotFound { subreddit: String },

    #[error("Forbidden access to {resource}")]
    Forbidden { resource: String },

    #[error("Rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Reddit server error: {status_code}")]
    ServerError { status_code: u16 },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Subscription closed")]
    Disconnected,
}

impl StreamError {
    /// Transient faults are absorbed inside the feed client's own backoff;
    /// everything else closes the subscription.
    pub fn is_transient(&self) -> bool {
        match self {
            StreamError::RateLimited { .. }
            | StreamError::ServerError { .. }
            | StreamError::RequestTimeout
            | StreamError::InvalidResponse { .. } => true,
            StreamError::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Server-mandated wait, where one was communicated.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            StreamError::RateLimited { retry_after } => {
                Some(Duration::from_secs(*retry_after))
            }
            _ => None,
        }
    }
}

/// Errors from a single notification delivery attempt. Never fatal for the
/// run; scoped to the one matched post.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid mail address: {address}")]
    InvalidAddress { address: String },

    #[error("Delivery timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Mail transport error: {message}")]
    Transport { message: String },
}
