//! Deposit creation: Lightning invoices and hosted checkouts.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sirens_core::RateSource;
use sirens_helio::{ChargeRequest, PaylinkRequest};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub amount_usd: f64,
    pub customer_reference: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub invoice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    pub amount_usd: f64,
    pub btc_amount: f64,
    pub msats: u64,
    pub rate: f64,
    pub rate_source: RateSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

/// `POST /api/deposits/invoice`
///
/// Converts the USD amount at the freshest rate the vendor will give us
/// and returns the wallet-scannable invoice together with the amounts it
/// was raised for. `rateSource: "fallback"` marks a conversion done on the
/// static rate.
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let Some(speed) = state.speed else {
        return Err(ApiError::misconfigured());
    };

    if !request.amount_usd.is_finite() || request.amount_usd <= 0.0 {
        return Err(ApiError::bad_request("A valid USD amount is required."));
    }

    let deposit = speed
        .create_usd_deposit_invoice(request.amount_usd, request.customer_reference)
        .await?;

    Ok(Json(InvoiceResponse {
        invoice: deposit.payment_request,
        invoice_id: deposit.invoice_id,
        amount_usd: deposit.conversion.amount_usd,
        btc_amount: deposit.conversion.amount_btc,
        msats: deposit.conversion.msats,
        rate: deposit.rate.rate,
        rate_source: deposit.rate.source,
        expires_at: deposit.expires_at,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargeRequest {
    pub amount_sol: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResponse {
    pub charge_id: String,
    pub page_url: String,
}

/// `POST /api/deposits/charge` — hosted Helio checkout for a SOL deposit.
pub async fn create_charge(
    State(state): State<AppState>,
    Json(request): Json<CreateChargeRequest>,
) -> Result<Json<ChargeResponse>, ApiError> {
    let Some(helio) = state.helio else {
        return Err(ApiError::misconfigured());
    };

    let charge = helio
        .client
        .create_charge(ChargeRequest {
            amount_sol: request.amount_sol,
            wallet_id: helio.wallet_id.clone(),
            currency_id: helio.currency_id.clone(),
        })
        .await?;

    Ok(Json(ChargeResponse {
        charge_id: charge.id,
        page_url: charge.page_url,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaylinkRequest {
    pub amount_usd: f64,
}

#[derive(Debug, Serialize)]
pub struct PaylinkResponse {
    pub id: Option<String>,
    pub url: Option<String>,
}

/// `POST /api/deposits/paylink` — shareable Helio payment link in USD.
pub async fn create_paylink(
    State(state): State<AppState>,
    Json(request): Json<CreatePaylinkRequest>,
) -> Result<Json<PaylinkResponse>, ApiError> {
    let Some(helio) = state.helio else {
        return Err(ApiError::misconfigured());
    };

    let paylink = helio
        .client
        .create_paylink(PaylinkRequest {
            amount_usd: request.amount_usd,
            redirect_url: helio.redirect_url.clone(),
        })
        .await?;

    Ok(Json(PaylinkResponse {
        id: paylink.id,
        url: paylink.url,
    }))
}
