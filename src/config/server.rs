use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Externally visible base URL; the OAuth callback is `{public_url}/callback`
    pub public_url: String,

    /// Idle time after which a session is discarded (default: 3600)
    pub session_ttl_secs: u64,

    /// How often expired sessions are swept (default: 300)
    pub sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            public_url: "http://127.0.0.1:5000".to_string(),
            session_ttl_secs: 3600,
            sweep_interval_secs: 300,
        }
    }
}

impl ServerConfig {
    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.public_url.trim_end_matches('/'))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// IANA timezone used for post times on the recent page
    pub timezone: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: "Australia/Sydney".to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; defaults to the platform data directory
    pub path: Option<PathBuf>,
}
