//! Error for the Helio deposit backend

use thiserror::Error;

/// Helio Error
#[derive(Debug, Error)]
pub enum Error {
    /// API keys not configured; nothing was sent to the vendor
    #[error("helio API keys are not configured")]
    MissingApiKey,
    /// Deposit amount failed validation
    #[error("a valid deposit amount is required, got {0}")]
    InvalidAmount(f64),
    /// Base url could not be parsed
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    /// Transport-level failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Payload could not be decoded
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Vendor rejected the call
    #[error("helio API error ({status}): {message}")]
    Api {
        /// HTTP status the vendor answered with
        status: u16,
        /// Vendor-supplied `message`/`error` field, verbatim when present
        message: String,
    },
}
