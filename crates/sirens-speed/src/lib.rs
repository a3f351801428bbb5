//! Sirens Fortune Lightning backend for Speed (tryspeed.com)
//!
//! Resolves a live BTC/USD rate, converts the USD deposit into
//! millisatoshis and requests a Lightning invoice from the Speed API,
//! tolerating the endpoint paths and payload shapes the vendor has used
//! across API versions.

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use sirens_core::util::unix_time;
use sirens_core::{convert_usd, AmountError, Conversion, RateQuote, RateSource};
use url::Url;
use uuid::Uuid;

use error::Error;
use invoice::{extract_expiry, extract_invoice_id, extract_payment_request};
pub use invoice::{InvoiceRequest, InvoiceResponse};
use rates::{extract_rate, RATE_ENDPOINTS};

pub mod error;
mod invoice;
mod rates;

/// Production API base.
const DEFAULT_BASE_URL: &str = "https://api.tryspeed.com/v1";

/// Rate used when every live source fails and no override is configured.
/// Matches the static price the site hardcoded before live rates existed.
pub const DEFAULT_FALLBACK_RATE: f64 = 100_000.0;

/// Metadata tag identifying invoices raised by this service.
const METADATA_SOURCE: &str = "sirens-fortune-web";

/// Speed API client
#[derive(Clone)]
pub struct SpeedClient {
    api_key: String,
    base_url: Url,
    client: Client,
    fallback_rate: f64,
}

impl std::fmt::Debug for SpeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeedClient")
            .field("base_url", &self.base_url.as_str())
            .field("fallback_rate", &self.fallback_rate)
            .finish()
    }
}

/// A Lightning invoice together with the conversion that produced it.
///
/// Returned whole so callers can render both the wallet-scannable string
/// and a human-readable amount summary without recomputing.
#[derive(Debug, Clone)]
pub struct DepositInvoice {
    /// The wallet-scannable payment request.
    pub payment_request: String,
    /// Vendor-assigned invoice id, when present.
    pub invoice_id: Option<String>,
    /// Unix seconds at which the invoice expires, when known.
    pub expires_at: Option<u64>,
    /// The USD/BTC/msat amounts the invoice was raised for.
    pub conversion: Conversion,
    /// The rate the conversion used; check [`RateQuote::is_stale`].
    pub rate: RateQuote,
}

impl SpeedClient {
    /// Create a new Speed client.
    ///
    /// A non-positive `fallback_rate` is replaced by
    /// [`DEFAULT_FALLBACK_RATE`].
    ///
    /// # Errors
    ///
    /// [`Error::MissingApiKey`] when `api_key` is empty — constructing a
    /// client is the only way to reach the vendor, so the misconfiguration
    /// is caught before any network traffic. [`Error::InvalidUrl`] for an
    /// unparseable base url, [`Error::Http`] when the transport cannot be
    /// built.
    pub fn new(
        api_key: &str,
        api_url: Option<&str>,
        fallback_rate: f64,
        timeout: Duration,
    ) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        // Url::join drops the last path segment unless the base ends with
        // a slash.
        let mut base = api_url.unwrap_or(DEFAULT_BASE_URL).to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder().timeout(timeout).build()?;

        let fallback_rate = if fallback_rate.is_finite() && fallback_rate > 0.0 {
            fallback_rate
        } else {
            DEFAULT_FALLBACK_RATE
        };

        tracing::info!("Created Speed backend for {}", base_url);

        Ok(Self {
            api_key: api_key.to_string(),
            base_url,
            client,
            fallback_rate,
        })
    }

    /// Resolve the current `from`/`to` exchange rate.
    ///
    /// Tries each known rate endpoint in priority order and returns the
    /// first payload that yields a usable rate; a failing candidate is
    /// logged and skipped, never fatal. When every candidate fails the
    /// configured static fallback rate is returned flagged stale, so
    /// resolution itself cannot fail the deposit.
    pub async fn resolve_rate(&self, from: &str, to: &str) -> RateQuote {
        for path in RATE_ENDPOINTS {
            let url = match self.rate_url(path, from, to) {
                Ok(url) => url,
                Err(err) => {
                    tracing::warn!("Skipping malformed rate url {path}: {err}");
                    continue;
                }
            };

            let response = match self
                .client
                .get(url.clone())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Accept", "application/json")
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!("Rate endpoint {url} unreachable: {err}");
                    continue;
                }
            };

            if !response.status().is_success() {
                tracing::warn!("Rate endpoint {url} answered {}", response.status());
                continue;
            }

            let payload: Value = match response.json().await {
                Ok(payload) => payload,
                Err(err) => {
                    tracing::warn!("Rate endpoint {url} returned invalid json: {err}");
                    continue;
                }
            };

            if let Some(quote) = extract_rate(&payload).and_then(RateQuote::live) {
                tracing::debug!("Resolved {from}/{to} rate {} via {path}", quote.rate);
                return quote;
            }

            tracing::warn!("Rate endpoint {url} payload had no usable rate");
        }

        tracing::warn!(
            "All rate endpoints failed, falling back to static rate {}",
            self.fallback_rate
        );

        RateQuote {
            rate: self.fallback_rate,
            source: RateSource::Fallback,
            fetched_at: unix_time(),
        }
    }

    /// Create a Lightning invoice.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] when the vendor rejects the call, carrying the
    /// vendor's own message verbatim when it sent one;
    /// [`Error::MissingPaymentRequest`] when the call succeeds but the
    /// payload holds no recognizable payment string.
    pub async fn create_invoice(&self, request: InvoiceRequest) -> Result<InvoiceResponse, Error> {
        let url = self.base_url.join("invoices")?;

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = vendor_message(&payload)
                .unwrap_or_else(|| "failed to create Lightning invoice".to_string());
            tracing::error!("Speed invoice creation failed ({status}): {message}");
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let Some(payment_request) = extract_payment_request(&payload) else {
            tracing::error!("Speed invoice response did not include a payment request");
            return Err(Error::MissingPaymentRequest);
        };

        let invoice_id = extract_invoice_id(&payload);
        let expires_at = extract_expiry(&payload, &payment_request);

        tracing::info!("Created Speed invoice {}", invoice_id.as_deref().unwrap_or("<no id>"));

        Ok(InvoiceResponse {
            payment_request,
            invoice_id,
            expires_at,
        })
    }

    /// Run the whole deposit pipeline for a USD amount: resolve a rate,
    /// convert, and request the invoice.
    ///
    /// # Errors
    ///
    /// Amount validation errors are returned before any outbound call;
    /// invoice-creation errors are those of [`Self::create_invoice`]. Rate
    /// failures never error — they degrade to the fallback rate, visible
    /// on the returned quote.
    pub async fn create_usd_deposit_invoice(
        &self,
        amount_usd: f64,
        customer_reference: Option<String>,
    ) -> Result<DepositInvoice, Error> {
        if !amount_usd.is_finite() || amount_usd <= 0.0 {
            return Err(Error::Amount(AmountError::InvalidUsdAmount(amount_usd)));
        }

        let rate = self.resolve_rate("BTC", "USD").await;
        let conversion = convert_usd(amount_usd, &rate)?;

        let reference = customer_reference.unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut metadata = HashMap::new();
        metadata.insert("usdAmount".to_string(), format!("{amount_usd}"));
        metadata.insert("customerReference".to_string(), reference);
        metadata.insert("source".to_string(), METADATA_SOURCE.to_string());

        let invoice = self
            .create_invoice(InvoiceRequest {
                amount_msats: conversion.msats,
                description: format!("Sirens Fortune deposit ({amount_usd:.2} USD)"),
                metadata,
            })
            .await?;

        Ok(DepositInvoice {
            payment_request: invoice.payment_request,
            invoice_id: invoice.invoice_id,
            expires_at: invoice.expires_at,
            conversion,
            rate,
        })
    }

    fn rate_url(&self, path: &str, from: &str, to: &str) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair("from", from)
            .append_pair("to", to);
        Ok(url)
    }
}

fn vendor_message(payload: &Value) -> Option<String> {
    for field in ["message", "error"] {
        if let Some(message) = payload.get(field).and_then(Value::as_str) {
            if !message.is_empty() {
                return Some(message.to_string());
            }
        }
    }
    None
}
