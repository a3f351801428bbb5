//! Speed environment variables

use std::env;

use crate::config::SpeedConfig;

pub const ENV_SPEED_API_KEY: &str = "SIRENS_DEPOSITD_SPEED_API_KEY";
pub const ENV_SPEED_API_URL: &str = "SIRENS_DEPOSITD_SPEED_API_URL";
pub const ENV_SPEED_FALLBACK_RATE: &str = "SIRENS_DEPOSITD_SPEED_FALLBACK_RATE";
pub const ENV_SPEED_TIMEOUT_MS: &str = "SIRENS_DEPOSITD_SPEED_TIMEOUT_MS";

impl SpeedConfig {
    pub fn from_env(mut self) -> Self {
        if let Ok(api_key) = env::var(ENV_SPEED_API_KEY) {
            self.api_key = api_key;
        }

        if let Ok(api_url) = env::var(ENV_SPEED_API_URL) {
            self.api_url = Some(api_url);
        }

        if let Ok(rate_str) = env::var(ENV_SPEED_FALLBACK_RATE) {
            if let Ok(rate) = rate_str.parse() {
                self.fallback_rate = rate;
            }
        }

        if let Ok(timeout_str) = env::var(ENV_SPEED_TIMEOUT_MS) {
            if let Ok(timeout) = timeout_str.parse() {
                self.timeout_ms = timeout;
            }
        }

        self
    }
}
