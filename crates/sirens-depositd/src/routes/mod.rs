//! HTTP routes for the deposit daemon.

pub mod deposits;
pub mod health;
pub mod rates;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/rates", get(rates::get_rate))
        .route("/api/deposits/invoice", post(deposits::create_invoice))
        .route("/api/deposits/charge", post(deposits::create_charge))
        .route("/api/deposits/paylink", post(deposits::create_paylink))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
