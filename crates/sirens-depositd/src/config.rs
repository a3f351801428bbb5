//! Settings, loaded from an optional TOML file and environment overrides.

use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use sirens_speed::DEFAULT_FALLBACK_RATE;

/// Listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_host: String,
    pub listen_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_host: "127.0.0.1".to_string(),
            listen_port: 8080,
        }
    }
}

/// Speed (Lightning) backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub api_key: String,
    pub api_url: Option<String>,
    /// Static BTC/USD rate used when every live rate source fails.
    pub fallback_rate: f64,
    pub timeout_ms: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: None,
            fallback_rate: DEFAULT_FALLBACK_RATE,
            timeout_ms: 10_000,
        }
    }
}

/// Helio (hosted checkout) backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HelioConfig {
    pub api_key: String,
    pub public_key: String,
    pub api_url: Option<String>,
    /// Receiving wallet for charges.
    pub wallet_id: String,
    /// Currency the charges are priced in (defaults to SOL).
    pub currency_id: String,
    pub redirect_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for HelioConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            public_key: String::new(),
            api_url: None,
            wallet_id: "68d51417b75b14c25b97d4c8".to_string(),
            currency_id: "6340313846e4f91b8abc5195".to_string(),
            redirect_url: None,
            timeout_ms: 10_000,
        }
    }
}

/// Daemon settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub speed: SpeedConfig,
    pub helio: HelioConfig,
}

impl Settings {
    /// Load settings from the given TOML file, then apply environment
    /// overrides. A missing file is not an error; defaults are used.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file exists but cannot be
    /// parsed into valid settings.
    pub fn new(config_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let settings = match config_file {
            Some(path) if path.exists() => Config::builder()
                .add_source(File::from(path))
                .build()?
                .try_deserialize()?,
            Some(path) => {
                tracing::warn!("Config file {} does not exist, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        Ok(settings.from_env())
    }

    /// Apply environment overrides to every section.
    pub fn from_env(mut self) -> Self {
        self.server = self.server.from_env();
        self.speed = self.speed.from_env();
        self.helio = self.helio.from_env();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.server.listen_port, 8080);
        assert_eq!(settings.speed.fallback_rate, DEFAULT_FALLBACK_RATE);
        assert!(settings.speed.api_key.is_empty());
    }

    #[test]
    fn partial_toml_fills_the_rest_with_defaults() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[speed]\napi_key = \"sk_live_x\"\nfallback_rate = 65000.0\n",
                config::FileFormat::Toml,
            ))
            .build()
            .expect("builds")
            .try_deserialize()
            .expect("deserializes");

        assert_eq!(settings.speed.api_key, "sk_live_x");
        assert_eq!(settings.speed.fallback_rate, 65_000.0);
        assert_eq!(settings.speed.timeout_ms, 10_000);
        assert_eq!(settings.server.listen_host, "127.0.0.1");
    }
}
