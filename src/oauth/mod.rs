//! OAuth 1.0a sign-in against the API provider.
//!
//! The three-legged flow: obtain a request token bound to our callback URL,
//! send the user to the provider's authenticate page, then exchange the
//! returned verifier for an access token.

pub mod signer;

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use url::Url;

use crate::app::{Result, TweetstatsError};
use crate::config::ApiConfig;
use crate::fetcher::http_fetcher::read_success;

pub use signer::Consumer;

/// Temporary credentials held between `/` and `/callback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
}

/// Credentials for calls made on behalf of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub secret: String,
    pub user_id: String,
    pub screen_name: String,
}

impl AccessToken {
    pub fn pair(&self) -> (&str, &str) {
        (&self.token, &self.secret)
    }
}

#[async_trait]
pub trait OAuthProvider {
    async fn request_token(&self, callback_url: &str) -> Result<RequestToken>;

    fn authenticate_url(&self, request_token: &RequestToken) -> Result<Url>;

    async fn access_token(&self, request_token: &RequestToken, verifier: &str)
        -> Result<AccessToken>;
}

pub struct OAuthClient {
    http: Client,
    consumer: Consumer,
    api: ApiConfig,
}

impl OAuthClient {
    pub fn new(http: Client, consumer: Consumer, api: ApiConfig) -> Self {
        Self {
            http,
            consumer,
            api,
        }
    }

    async fn post_token_endpoint(
        &self,
        path: &str,
        token: Option<(&str, &str)>,
        extra: &[(&str, &str)],
    ) -> Result<HashMap<String, String>> {
        let url = self.api.endpoint(path)?;
        let header = signer::authorization_header("POST", &url, &self.consumer, token, extra)?;

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, header)
            .send()
            .await?;
        let body = read_success(response).await?;

        Ok(parse_token_response(&body))
    }
}

#[async_trait]
impl OAuthProvider for OAuthClient {
    async fn request_token(&self, callback_url: &str) -> Result<RequestToken> {
        let fields = self
            .post_token_endpoint(
                "oauth/request_token",
                None,
                &[("oauth_callback", callback_url)],
            )
            .await?;

        if fields.get("oauth_callback_confirmed").map(String::as_str) != Some("true") {
            return Err(TweetstatsError::OAuth(
                "Provider did not confirm the callback URL".into(),
            ));
        }

        Ok(RequestToken {
            token: required(&fields, "oauth_token")?,
            secret: required(&fields, "oauth_token_secret")?,
        })
    }

    fn authenticate_url(&self, request_token: &RequestToken) -> Result<Url> {
        let mut url = self.api.endpoint("oauth/authenticate")?;
        url.query_pairs_mut()
            .append_pair("oauth_token", &request_token.token);
        Ok(url)
    }

    async fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AccessToken> {
        let fields = self
            .post_token_endpoint(
                "oauth/access_token",
                Some((request_token.token.as_str(), request_token.secret.as_str())),
                &[("oauth_verifier", verifier)],
            )
            .await?;

        Ok(AccessToken {
            token: required(&fields, "oauth_token")?,
            secret: required(&fields, "oauth_token_secret")?,
            user_id: fields.get("user_id").cloned().unwrap_or_default(),
            screen_name: fields.get("screen_name").cloned().unwrap_or_default(),
        })
    }
}

/// Token endpoints answer with a form-urlencoded body.
pub fn parse_token_response(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

fn required(fields: &HashMap<String, String>, key: &str) -> Result<String> {
    fields
        .get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| TweetstatsError::OAuth(format!("Token response is missing {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_response() {
        let fields = parse_token_response(
            b"oauth_token=abc&oauth_token_secret=s%2Fecret&oauth_callback_confirmed=true",
        );
        assert_eq!(fields.get("oauth_token").unwrap(), "abc");
        assert_eq!(fields.get("oauth_token_secret").unwrap(), "s/ecret");
        assert_eq!(fields.get("oauth_callback_confirmed").unwrap(), "true");
    }

    #[test]
    fn test_required_field_missing_or_empty() {
        let fields = parse_token_response(b"oauth_token=&screen_name=x");
        assert!(matches!(
            required(&fields, "oauth_token"),
            Err(TweetstatsError::OAuth(_))
        ));
        assert!(required(&fields, "oauth_token_secret").is_err());
        assert_eq!(required(&fields, "screen_name").unwrap(), "x");
    }

    #[test]
    fn test_authenticate_url() {
        let client = OAuthClient::new(
            Client::new(),
            Consumer::new("ck", "cs"),
            ApiConfig {
                base_url: "https://api.example.com".into(),
                ..ApiConfig::default()
            },
        );
        let token = RequestToken {
            token: "req/tok".into(),
            secret: "s".into(),
        };

        let url = client.authenticate_url(&token).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/oauth/authenticate?oauth_token=req%2Ftok"
        );
    }
}
