//! Exchange-rate lookup for the deposit widget.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sirens_core::RateSource;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub rate: f64,
    pub from: String,
    pub to: String,
    pub source: RateSource,
}

/// `GET /api/rates?from=BTC&to=USD`
///
/// Answers 200 even when every live source is down — the fallback rate is
/// returned with `source: "fallback"` so the widget can warn the user.
pub async fn get_rate(
    State(state): State<AppState>,
    Query(query): Query<RatesQuery>,
) -> Result<Json<RatesResponse>, ApiError> {
    let Some(speed) = state.speed else {
        return Err(ApiError::misconfigured());
    };

    let from = query.from.unwrap_or_else(|| "BTC".to_string()).to_uppercase();
    let to = query.to.unwrap_or_else(|| "USD".to_string()).to_uppercase();

    let quote = speed.resolve_rate(&from, &to).await;

    Ok(Json(RatesResponse {
        rate: quote.rate,
        from,
        to,
        source: quote.source,
    }))
}
