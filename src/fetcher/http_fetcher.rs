use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use url::Url;

use crate::app::{Result, TweetstatsError};
use crate::config::ApiConfig;
use crate::domain::FeedSnapshot;
use crate::fetcher::TimelineSource;
use crate::normalizer::Normalizer;
use crate::oauth::signer::{self, Consumer};
use crate::oauth::AccessToken;

pub fn http_client(api: &ApiConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(api.timeout())
        .gzip(true)
        .brotli(true)
        .user_agent(api.user_agent.as_str())
        .build()?;

    Ok(client)
}

/// Returns the body of a 2xx response, or the status and body as an error.
pub async fn read_success(response: Response) -> Result<Vec<u8>> {
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    if !status.is_success() {
        return Err(TweetstatsError::Api {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(body)
}

pub struct HttpTimelineClient {
    client: Client,
    consumer: Consumer,
    api: ApiConfig,
    normalizer: Normalizer,
}

impl HttpTimelineClient {
    pub fn new(client: Client, consumer: Consumer, api: ApiConfig) -> Self {
        Self {
            client,
            consumer,
            api,
            normalizer: Normalizer::new(),
        }
    }

    async fn signed_get(&self, url: Url, token: &AccessToken) -> Result<Response> {
        let header = signer::authorization_header("GET", &url, &self.consumer, Some(token.pair()), &[])?;
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, header)
            .send()
            .await?;
        Ok(response)
    }

    async fn verify_credentials(&self, token: &AccessToken) -> Result<()> {
        let url = self.api.endpoint("1.1/account/verify_credentials.json")?;
        let response = self.signed_get(url, token).await?;

        let remaining = response
            .headers()
            .get("x-rate-limit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        read_success(response).await?;

        tracing::info!(
            "Verified credentials for @{} (rate limit remaining: {})",
            token.screen_name,
            remaining.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }

    pub fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = self.api.endpoint("1.1/statuses/home_timeline.json")?;
        url.query_pairs_mut()
            .append_pair("count", &self.api.page_size.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("tweet_mode", "extended");
        Ok(url)
    }
}

#[async_trait]
impl TimelineSource for HttpTimelineClient {
    async fn fetch_feed_snapshot(&self, token: &AccessToken) -> Result<FeedSnapshot> {
        self.verify_credentials(token).await?;

        let mut posts = Vec::new();
        for page in 1..=self.api.page_count {
            let response = self.signed_get(self.page_url(page)?, token).await?;
            let body = read_success(response).await?;
            let page_posts = self.normalizer.normalize(&body)?;

            tracing::debug!("Fetched {} posts from page {}", page_posts.len(), page);
            posts.extend(page_posts);
        }

        tracing::info!("Fetched {} posts for @{}", posts.len(), token.screen_name);
        Ok(FeedSnapshot::new(posts))
    }
}
