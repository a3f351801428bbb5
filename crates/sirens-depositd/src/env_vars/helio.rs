//! Helio environment variables

use std::env;

use crate::config::HelioConfig;

pub const ENV_HELIO_API_KEY: &str = "SIRENS_DEPOSITD_HELIO_API_KEY";
pub const ENV_HELIO_PUBLIC_KEY: &str = "SIRENS_DEPOSITD_HELIO_PUBLIC_KEY";
pub const ENV_HELIO_API_URL: &str = "SIRENS_DEPOSITD_HELIO_API_URL";
pub const ENV_HELIO_WALLET_ID: &str = "SIRENS_DEPOSITD_HELIO_WALLET_ID";
pub const ENV_HELIO_CURRENCY_ID: &str = "SIRENS_DEPOSITD_HELIO_CURRENCY_ID";
pub const ENV_HELIO_REDIRECT_URL: &str = "SIRENS_DEPOSITD_HELIO_REDIRECT_URL";
pub const ENV_HELIO_TIMEOUT_MS: &str = "SIRENS_DEPOSITD_HELIO_TIMEOUT_MS";

impl HelioConfig {
    pub fn from_env(mut self) -> Self {
        if let Ok(api_key) = env::var(ENV_HELIO_API_KEY) {
            self.api_key = api_key;
        }

        if let Ok(public_key) = env::var(ENV_HELIO_PUBLIC_KEY) {
            self.public_key = public_key;
        }

        if let Ok(api_url) = env::var(ENV_HELIO_API_URL) {
            self.api_url = Some(api_url);
        }

        if let Ok(wallet_id) = env::var(ENV_HELIO_WALLET_ID) {
            self.wallet_id = wallet_id;
        }

        if let Ok(currency_id) = env::var(ENV_HELIO_CURRENCY_ID) {
            self.currency_id = currency_id;
        }

        if let Ok(redirect_url) = env::var(ENV_HELIO_REDIRECT_URL) {
            self.redirect_url = Some(redirect_url);
        }

        if let Ok(timeout_str) = env::var(ENV_HELIO_TIMEOUT_MS) {
            if let Ok(timeout) = timeout_str.parse() {
                self.timeout_ms = timeout;
            }
        }

        self
    }
}
