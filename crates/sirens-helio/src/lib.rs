//! Sirens Fortune checkout backend for Helio
//!
//! Creates hosted charges (SOL, priced in base units) and USD paylinks via
//! the Helio API and returns the checkout URL for the site to redirect to.

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use error::Error;

pub mod error;

/// Production API base.
const DEFAULT_BASE_URL: &str = "https://api.hel.io/v1";

/// Base units in one SOL (9 decimals).
pub const BASE_UNITS_PER_SOL: f64 = 1_000_000_000.0;

/// Helio API client
#[derive(Clone)]
pub struct HelioClient {
    secret_key: String,
    public_key: String,
    base_url: Url,
    client: Client,
}

impl std::fmt::Debug for HelioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelioClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Inputs for a hosted SOL charge.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// Deposit amount in whole SOL.
    pub amount_sol: f64,
    /// Receiving Helio wallet id.
    pub wallet_id: String,
    /// Helio currency id the charge is priced in.
    pub currency_id: String,
}

/// A created hosted charge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    /// Vendor-assigned charge id.
    pub id: String,
    /// Hosted checkout page for the payer.
    pub page_url: String,
}

/// Inputs for a USD paylink.
#[derive(Debug, Clone)]
pub struct PaylinkRequest {
    /// Deposit amount in USD.
    pub amount_usd: f64,
    /// Where the payer lands after completing the payment.
    pub redirect_url: Option<String>,
}

/// A created paylink.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Paylink {
    /// Vendor-assigned paylink id, when present.
    pub id: Option<String>,
    /// Shareable payment link, when present.
    pub url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeBody {
    name: String,
    price: String,
    pricing_currency: String,
    template: &'static str,
    features: Value,
    recipients: Vec<Recipient>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient {
    wallet_id: String,
    currency_id: String,
}

#[derive(Serialize)]
struct PaylinkBody {
    amount: String,
    currency: &'static str,
    metadata: PaylinkMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_url: Option<String>,
}

#[derive(Serialize)]
struct PaylinkMetadata {
    note: &'static str,
}

/// Convert a SOL amount to Helio base units, rounding to the nearest unit.
///
/// # Errors
///
/// [`Error::InvalidAmount`] for non-finite or non-positive amounts and for
/// conversions that round to zero or overflow the unit.
pub fn sol_to_base_units(amount_sol: f64) -> Result<u64, Error> {
    if !amount_sol.is_finite() || amount_sol <= 0.0 {
        return Err(Error::InvalidAmount(amount_sol));
    }

    let units = (amount_sol * BASE_UNITS_PER_SOL).round();
    if !units.is_finite() || units < 1.0 || units > u64::MAX as f64 {
        return Err(Error::InvalidAmount(amount_sol));
    }

    Ok(units as u64)
}

impl HelioClient {
    /// Create a new Helio client.
    ///
    /// # Errors
    ///
    /// [`Error::MissingApiKey`] when either key is empty — charges need the
    /// public key in the query string and the secret key in the header, so
    /// both gate before any network traffic. [`Error::InvalidUrl`] and
    /// [`Error::Http`] as for any client construction.
    pub fn new(
        secret_key: &str,
        public_key: &str,
        api_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        if secret_key.trim().is_empty() || public_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let mut base = api_url.unwrap_or(DEFAULT_BASE_URL).to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder().timeout(timeout).build()?;

        tracing::info!("Created Helio backend for {}", base_url);

        Ok(Self {
            secret_key: secret_key.to_string(),
            public_key: public_key.to_string(),
            base_url,
            client,
        })
    }

    /// Create a hosted charge for a SOL deposit.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAmount`] before any call for a bad amount,
    /// [`Error::Api`] when the vendor rejects the charge, [`Error::Json`]
    /// when a successful response is missing the charge id or page url.
    pub async fn create_charge(&self, request: ChargeRequest) -> Result<Charge, Error> {
        let price = sol_to_base_units(request.amount_sol)?;

        let mut url = self.base_url.join("charge/api-key")?;
        url.query_pairs_mut().append_pair("apiKey", &self.public_key);

        let body = ChargeBody {
            name: format!("Sirens Fortune Deposit - {} SOL", request.amount_sol),
            price: price.to_string(),
            pricing_currency: request.currency_id.clone(),
            template: "OTHER",
            features: Value::Object(Default::default()),
            recipients: vec![Recipient {
                wallet_id: request.wallet_id,
                currency_id: request.currency_id,
            }],
        };

        let payload = self.post(url, &body).await?;
        let charge: Charge = serde_json::from_value(payload)?;

        tracing::info!("Created Helio charge {}", charge.id);
        Ok(charge)
    }

    /// Create a shareable USD paylink.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAmount`] before any call for a bad amount,
    /// [`Error::Api`] when the vendor rejects the paylink.
    pub async fn create_paylink(&self, request: PaylinkRequest) -> Result<Paylink, Error> {
        if !request.amount_usd.is_finite() || request.amount_usd <= 0.0 {
            return Err(Error::InvalidAmount(request.amount_usd));
        }

        let url = self.base_url.join("paylinks")?;

        let body = PaylinkBody {
            amount: request.amount_usd.to_string(),
            currency: "USD",
            metadata: PaylinkMetadata {
                note: "Website deposit",
            },
            redirect_url: request.redirect_url,
        };

        let payload = self.post(url, &body).await?;
        let paylink: Paylink = serde_json::from_value(payload)?;

        tracing::info!("Created Helio paylink {}", paylink.id.as_deref().unwrap_or("<no id>"));
        Ok(paylink)
    }

    async fn post<T: Serialize>(&self, url: Url, body: &T) -> Result<Value, Error> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = vendor_message(&payload)
                .unwrap_or_else(|| "failed to create Helio payment".to_string());
            tracing::error!("Helio call failed ({status}): {message}");
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(payload)
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

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    use super::*;

    fn client_for(server: &ServerGuard) -> HelioClient {
        HelioClient::new(
            "sk_helio_secret",
            "pk_helio_public",
            Some(&server.url()),
            Duration::from_secs(2),
        )
        .expect("client")
    }

    #[test]
    fn sol_base_unit_conversion_rounds_to_nearest() {
        assert_eq!(sol_to_base_units(1.0).expect("converts"), 1_000_000_000);
        assert_eq!(sol_to_base_units(0.5).expect("converts"), 500_000_000);
        assert_eq!(sol_to_base_units(1.123456789).expect("converts"), 1_123_456_789);
    }

    #[test]
    fn sol_base_unit_conversion_rejects_bad_amounts() {
        assert!(sol_to_base_units(0.0).is_err());
        assert!(sol_to_base_units(-1.0).is_err());
        assert!(sol_to_base_units(f64::NAN).is_err());
        assert!(sol_to_base_units(1e-10).is_err());
    }

    #[test]
    fn missing_keys_are_rejected_before_any_request() {
        assert!(matches!(
            HelioClient::new("", "pk", None, Duration::from_secs(2)),
            Err(Error::MissingApiKey)
        ));
        assert!(matches!(
            HelioClient::new("sk", "", None, Duration::from_secs(2)),
            Err(Error::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn creates_a_charge_with_the_public_key_in_the_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/charge/api-key")
            .match_query(Matcher::UrlEncoded(
                "apiKey".into(),
                "pk_helio_public".into(),
            ))
            .match_header("authorization", "Bearer sk_helio_secret")
            .match_body(Matcher::PartialJson(json!({
                "price": "500000000",
                "template": "OTHER",
                "recipients": [{
                    "walletId": "wallet_1",
                    "currencyId": "sol_currency",
                }],
            })))
            .with_status(200)
            .with_body(
                json!({ "id": "charge_1", "pageUrl": "https://hel.io/pay/charge_1" }).to_string(),
            )
            .create_async()
            .await;

        let charge = client_for(&server)
            .create_charge(ChargeRequest {
                amount_sol: 0.5,
                wallet_id: "wallet_1".to_string(),
                currency_id: "sol_currency".to_string(),
            })
            .await
            .expect("charge");

        mock.assert_async().await;
        assert_eq!(charge.id, "charge_1");
        assert_eq!(charge.page_url, "https://hel.io/pay/charge_1");
    }

    #[tokio::test]
    async fn surfaces_the_vendor_message_on_charge_rejection() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/charge/api-key")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(json!({ "message": "api key disabled" }).to_string())
            .create_async()
            .await;

        let err = client_for(&server)
            .create_charge(ChargeRequest {
                amount_sol: 1.0,
                wallet_id: "wallet_1".to_string(),
                currency_id: "sol_currency".to_string(),
            })
            .await
            .expect_err("rejected");

        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "api key disabled");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn creates_a_paylink() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/paylinks")
            .match_body(Matcher::PartialJson(json!({
                "amount": "20",
                "currency": "USD",
            })))
            .with_status(200)
            .with_body(json!({ "id": "pl_1", "url": "https://hel.io/x/pl_1" }).to_string())
            .create_async()
            .await;

        let paylink = client_for(&server)
            .create_paylink(PaylinkRequest {
                amount_usd: 20.0,
                redirect_url: None,
            })
            .await
            .expect("paylink");

        mock.assert_async().await;
        assert_eq!(paylink.id.as_deref(), Some("pl_1"));
        assert_eq!(paylink.url.as_deref(), Some("https://hel.io/x/pl_1"));
    }

    #[tokio::test]
    async fn paylink_amounts_validate_before_any_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/paylinks")
            .expect(0)
            .create_async()
            .await;

        let err = client_for(&server)
            .create_paylink(PaylinkRequest {
                amount_usd: 0.0,
                redirect_url: None,
            })
            .await
            .expect_err("zero amount");

        mock.assert_async().await;
        assert!(matches!(err, Error::InvalidAmount(_)));
    }
}
