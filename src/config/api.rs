use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::Result;

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for both the OAuth endpoints and the REST API
    pub base_url: String,

    /// Number of home timeline pages fetched per sign-in (default: 5)
    pub page_count: u32,

    /// Posts requested per page (default: 20)
    pub page_size: u32,

    /// HTTP request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twitter.com".to_string(),
            page_count: 5,
            page_size: 20,
            timeout_secs: 10,
            user_agent: concat!("tweetstats/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves `path` against `base_url`, keeping any path prefix of the base.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)?;
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}

/// Consumer credentials issued to this application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let api = ApiConfig::default();
        assert_eq!(api.page_count, 5);
        assert_eq!(api.page_size, 20);
        assert_eq!(api.timeout(), Duration::from_secs(10));
        assert!(api.user_agent.starts_with("tweetstats/"));
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let api = ApiConfig::default();
        assert_eq!(
            api.endpoint("oauth/request_token").unwrap().as_str(),
            "https://api.twitter.com/oauth/request_token"
        );
    }

    #[test]
    fn test_endpoint_keeps_prefix() {
        let api = ApiConfig {
            base_url: "http://localhost:8080/mock".into(),
            ..ApiConfig::default()
        };
        assert_eq!(
            api.endpoint("/1.1/account/verify_credentials.json")
                .unwrap()
                .as_str(),
            "http://localhost:8080/mock/1.1/account/verify_credentials.json"
        );
    }

    #[test]
    fn test_endpoint_invalid_base() {
        let api = ApiConfig {
            base_url: "not a url".into(),
            ..ApiConfig::default()
        };
        assert!(api.endpoint("oauth/authenticate").is_err());
    }
}
