//! Error for the Speed deposit backend

use thiserror::Error;

/// Speed Error
#[derive(Debug, Error)]
pub enum Error {
    /// No API key configured; nothing was sent to the vendor
    #[error("speed API key is not configured")]
    MissingApiKey,
    /// Base url could not be parsed
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    /// Transport-level failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Payload could not be serialized
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Vendor rejected the call
    #[error("speed API error ({status}): {message}")]
    Api {
        /// HTTP status the vendor answered with
        status: u16,
        /// Vendor-supplied `message`/`error` field, verbatim when present
        message: String,
    },
    /// Vendor reported success but returned no recognizable payment string
    #[error("invoice created but no payment request was returned")]
    MissingPaymentRequest,
    /// Deposit amount failed validation
    #[error(transparent)]
    Amount(#[from] sirens_core::AmountError),
}
