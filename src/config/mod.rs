//! Configuration management for tweetstats.
//!
//! Configuration is read from `~/.config/tweetstats/config.toml` unless a path
//! is given on the command line. If the default file doesn't exist, one with
//! comments is created. Consumer credentials and the bind address can be
//! overridden from the environment.

pub mod api;
pub mod server;

pub use api::{ApiConfig, OAuthConfig};
pub use server::{DatabaseConfig, DisplayConfig, ServerConfig};

use serde::Deserialize;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::oauth::Consumer;

pub const ENV_CONSUMER_KEY: &str = "TWEETSTATS_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "TWEETSTATS_CONSUMER_SECRET";
pub const ENV_BIND: &str = "TWEETSTATS_BIND";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub oauth: OAuthConfig,
    pub display: DisplayConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// A missing default file is created with comments. A missing explicit
    /// file is an error. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    tracing::info!("Created default config at {}", default_path.display());
                }
                default_path
            }
        };

        let mut config = Self::from_file(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/tweetstats/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tweetstats").join("config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(key) = env_override(ENV_CONSUMER_KEY) {
            self.oauth.consumer_key = key;
        }
        if let Some(secret) = env_override(ENV_CONSUMER_SECRET) {
            self.oauth.consumer_secret = secret;
        }
        if let Some(bind) = env_override(ENV_BIND) {
            self.server.bind = bind;
        }
    }

    /// Consumer credentials, required to sign anyone in.
    pub fn consumer(&self) -> Result<Consumer, ConfigError> {
        if self.oauth.consumer_key.is_empty() || self.oauth.consumer_secret.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(Consumer::new(
            self.oauth.consumer_key.clone(),
            self.oauth.consumer_secret.clone(),
        ))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# tweetstats configuration

[server]
# Address the web server listens on (env: TWEETSTATS_BIND)
bind = "127.0.0.1:5000"

# Externally visible URL; must match the callback registered with the provider
public_url = "http://127.0.0.1:5000"

# Idle seconds before a session and its fetched feed are discarded
session_ttl_secs = 3600
sweep_interval_secs = 300

[api]
base_url = "https://api.twitter.com"

# Home timeline pages fetched once per sign-in
page_count = 5
page_size = 20

timeout_secs = 10

[oauth]
# Application credentials (env: TWEETSTATS_CONSUMER_KEY, TWEETSTATS_CONSUMER_SECRET)
consumer_key = ""
consumer_secret = ""

[display]
# Timezone for post times on the recent page
timezone = "Australia/Sydney"

[database]
# SQLite file for the /db check; defaults to the platform data directory
# path = "/var/lib/tweetstats/tweetstats.db"
"##
        .to_string()
    }
}

fn env_override(key: &str) -> Option<String> {
    let value = env::var(key).ok().filter(|v| !v.is_empty())?;
    tracing::info!("Using {key} from environment");
    Some(value)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Consumer key and secret are not configured (set TWEETSTATS_CONSUMER_KEY and TWEETSTATS_CONSUMER_SECRET)")]
    MissingCredentials,

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}
