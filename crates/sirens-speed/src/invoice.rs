//! Invoice wire types and response normalization.

use std::collections::HashMap;
use std::str::FromStr;

use lightning_invoice::Bolt11Invoice;
use serde::Serialize;
use serde_json::Value;

/// Body of a Speed invoice-creation call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    /// Invoice amount in millisatoshis.
    pub amount_msats: u64,
    /// Human-readable description shown in the payer's wallet.
    pub description: String,
    /// Free-form metadata echoed back by vendor webhooks.
    pub metadata: HashMap<String, String>,
}

/// A created Lightning invoice, normalized from the vendor response.
#[derive(Debug, Clone)]
pub struct InvoiceResponse {
    /// The wallet-scannable payment request.
    pub payment_request: String,
    /// Vendor-assigned invoice id, when present.
    pub invoice_id: Option<String>,
    /// Unix seconds at which the invoice expires, when known.
    pub expires_at: Option<u64>,
}

/// Payment-string field names the vendor has used across API versions,
/// in priority order.
const PAYMENT_REQUEST_FIELDS: &[&str] = &[
    "paymentRequest",
    "invoice",
    "lightningInvoice",
    "encodedPaymentRequest",
];

/// First non-empty payment string under a known field name, ending with
/// the nested `data.paymentRequest` shape of older API versions.
pub(crate) fn extract_payment_request(payload: &Value) -> Option<String> {
    for field in PAYMENT_REQUEST_FIELDS {
        if let Some(request) = non_empty_string(payload.get(*field)) {
            return Some(request);
        }
    }

    non_empty_string(payload.get("data").and_then(|data| data.get("paymentRequest")))
}

pub(crate) fn extract_invoice_id(payload: &Value) -> Option<String> {
    non_empty_string(payload.get("id")).or_else(|| non_empty_string(payload.get("invoiceId")))
}

/// Expiry from the vendor payload when it sent one, else recovered from
/// the payment request itself when it is a parseable BOLT11 invoice.
pub(crate) fn extract_expiry(payload: &Value, payment_request: &str) -> Option<u64> {
    for field in ["expiresAt", "expiry"] {
        match payload.get(field) {
            Some(Value::Number(number)) => {
                if let Some(expiry) = number.as_u64() {
                    return Some(expiry);
                }
            }
            Some(Value::String(text)) => {
                if let Ok(expiry) = text.trim().parse::<u64>() {
                    return Some(expiry);
                }
            }
            _ => {}
        }
    }

    Bolt11Invoice::from_str(payment_request)
        .ok()
        .and_then(|invoice| invoice.expires_at())
        .map(|expiry| expiry.as_secs())
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value.and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => None,
    }
}
