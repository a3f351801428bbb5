//! Shared router state.

use std::time::Duration;

use sirens_helio::HelioClient;
use sirens_speed::SpeedClient;

use crate::config::Settings;

/// A configured Helio backend plus the account it deposits into.
#[derive(Debug, Clone)]
pub struct HelioContext {
    pub client: HelioClient,
    pub wallet_id: String,
    pub currency_id: String,
    pub redirect_url: Option<String>,
}

/// Read-only state shared by every request handler.
///
/// A backend whose credentials are missing stays `None`; its routes
/// answer with a configuration error and never call out.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub speed: Option<SpeedClient>,
    pub helio: Option<HelioContext>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        let speed = match SpeedClient::new(
            &settings.speed.api_key,
            settings.speed.api_url.as_deref(),
            settings.speed.fallback_rate,
            Duration::from_millis(settings.speed.timeout_ms),
        ) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!("Speed backend disabled: {err}");
                None
            }
        };

        let helio = match HelioClient::new(
            &settings.helio.api_key,
            &settings.helio.public_key,
            settings.helio.api_url.as_deref(),
            Duration::from_millis(settings.helio.timeout_ms),
        ) {
            Ok(client) => Some(HelioContext {
                client,
                wallet_id: settings.helio.wallet_id.clone(),
                currency_id: settings.helio.currency_id.clone(),
                redirect_url: settings.helio.redirect_url.clone(),
            }),
            Err(err) => {
                tracing::warn!("Helio backend disabled: {err}");
                None
            }
        };

        Self { speed, helio }
    }
}
