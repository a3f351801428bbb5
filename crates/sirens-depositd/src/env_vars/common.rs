//! Server environment variables

use std::env;

use crate::config::ServerConfig;

pub const ENV_LISTEN_HOST: &str = "SIRENS_DEPOSITD_LISTEN_HOST";
pub const ENV_LISTEN_PORT: &str = "SIRENS_DEPOSITD_LISTEN_PORT";

impl ServerConfig {
    pub fn from_env(mut self) -> Self {
        if let Ok(host) = env::var(ENV_LISTEN_HOST) {
            self.listen_host = host;
        }

        if let Ok(port_str) = env::var(ENV_LISTEN_PORT) {
            if let Ok(port) = port_str.parse() {
                self.listen_port = port;
            }
        }

        self
    }
}
