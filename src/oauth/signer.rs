//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use url::Url;

use crate::app::{Result, TweetstatsError};

type HmacSha1 = Hmac<Sha1>;

/// Everything except `A-Z a-z 0-9 - . _ ~` is escaped.
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Application credentials issued by the API provider.
#[derive(Debug, Clone)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

impl Consumer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE).to_string()
}

/// Builds a signed `Authorization` header value for one request.
///
/// `token` is the `(token, secret)` pair of the request or access token, if
/// any. `extra` holds additional `oauth_*` protocol parameters such as
/// `oauth_callback` or `oauth_verifier`. Query parameters of `url` are part
/// of the signature.
pub fn authorization_header(
    method: &str,
    url: &Url,
    consumer: &Consumer,
    token: Option<(&str, &str)>,
    extra: &[(&str, &str)],
) -> Result<String> {
    let nonce = hex::encode(rand::random::<[u8; 16]>());
    let timestamp = Utc::now().timestamp().to_string();
    header_with(method, url, consumer, token, extra, &nonce, &timestamp)
}

fn header_with(
    method: &str,
    url: &Url,
    consumer: &Consumer,
    token: Option<(&str, &str)>,
    extra: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> Result<String> {
    let mut oauth: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), consumer.key.clone()),
        ("oauth_nonce".into(), nonce.into()),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp.into()),
        ("oauth_version".into(), "1.0".into()),
    ];
    if let Some((token, _)) = token {
        oauth.push(("oauth_token".into(), token.into()));
    }
    oauth.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    let mut params = oauth.clone();
    params.extend(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())));

    let signature = signature(
        method,
        url,
        &params,
        &consumer.secret,
        token.map(|(_, secret)| secret),
    )?;
    oauth.push(("oauth_signature".into(), signature));
    oauth.sort();

    let fields: Vec<String> = oauth
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect();
    Ok(format!("OAuth {}", fields.join(", ")))
}

pub fn signature_base_string(method: &str, url: &Url, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(base_url.as_str()),
        encode(&param_string)
    )
}

pub fn signature(
    method: &str,
    url: &Url,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> Result<String> {
    let key = format!(
        "{}&{}",
        encode(consumer_secret),
        encode(token_secret.unwrap_or(""))
    );
    let base = signature_base_string(method, url, params);

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| TweetstatsError::OAuth(e.to_string()))?;
    mac.update(base.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
