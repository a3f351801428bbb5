//! API error responses and vendor-error to status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sirens_core::AmountError;

/// Standard error shape for every failed API call: `{ "error": ... }`
/// with a status reflecting the failure class.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// A required backend is not configured. Worded for the depositor, not
    /// the operator; details are in the daemon log.
    pub fn misconfigured() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server misconfiguration. Try again later.",
        )
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, msg)
    }

    /// Pass the vendor's status through when it is a valid HTTP status,
    /// else degrade to a generic upstream failure.
    fn from_vendor_status(status: u16, message: String) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.error }))).into_response()
    }
}

impl From<sirens_speed::error::Error> for ApiError {
    fn from(err: sirens_speed::error::Error) -> Self {
        use sirens_speed::error::Error as Speed;

        match err {
            Speed::MissingApiKey => Self::misconfigured(),
            Speed::Amount(AmountError::InvalidUsdAmount(_)) => {
                Self::bad_request("A valid USD amount is required.")
            }
            Speed::Amount(AmountError::AmountOutOfRange(_)) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unable to calculate invoice amount.",
            ),
            Speed::Api { status, message } => Self::from_vendor_status(status, message),
            Speed::MissingPaymentRequest => {
                Self::upstream("Invoice created but no payment request was returned.")
            }
            Speed::Http(err) => {
                tracing::error!("Speed transport error: {err}");
                Self::upstream("Unable to reach the payment provider.")
            }
            Speed::InvalidUrl(err) => {
                tracing::error!("Speed url error: {err}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error.")
            }
            Speed::Json(err) => {
                tracing::error!("Speed serialization error: {err}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error.")
            }
        }
    }
}

impl From<sirens_helio::error::Error> for ApiError {
    fn from(err: sirens_helio::error::Error) -> Self {
        use sirens_helio::error::Error as Helio;

        match err {
            Helio::MissingApiKey => Self::misconfigured(),
            Helio::InvalidAmount(_) => Self::bad_request("A valid deposit amount is required."),
            Helio::Api { status, message } => Self::from_vendor_status(status, message),
            Helio::Json(err) => {
                tracing::error!("Helio response missing expected fields: {err}");
                Self::upstream("Checkout created but no page URL was returned.")
            }
            Helio::Http(err) => {
                tracing::error!("Helio transport error: {err}");
                Self::upstream("Unable to reach the payment provider.")
            }
            Helio::InvalidUrl(err) => {
                tracing::error!("Helio url error: {err}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_statuses_pass_through_when_valid() {
        let err = ApiError::from(sirens_speed::error::Error::Api {
            status: 402,
            message: "insufficient permissions".to_string(),
        });
        assert_eq!(err.status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(err.error, "insufficient permissions");
    }

    #[test]
    fn nonsense_vendor_statuses_degrade_to_bad_gateway() {
        let err = ApiError::from(sirens_speed::error::Error::Api {
            status: 42,
            message: "weird".to_string(),
        });
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn contract_violations_are_upstream_failures() {
        let err = ApiError::from(sirens_speed::error::Error::MissingPaymentRequest);
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_amounts_are_the_callers_fault() {
        let err = ApiError::from(sirens_speed::error::Error::Amount(
            AmountError::InvalidUsdAmount(-1.0),
        ));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
