use chrono::{DateTime, Utc};
use html_escape::decode_html_entities;
use serde::Deserialize;

use crate::app::{Result, TweetstatsError};
use crate::domain::Post;

/// Timestamp layout used by the v1.1 API, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Debug, Deserialize)]
struct RawStatus {
    created_at: String,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    source: String,
    user: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    screen_name: String,
    name: String,
    #[serde(default)]
    statuses_count: u64,
    #[serde(default)]
    followers_count: u64,
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parses one timeline page (a JSON array of statuses) into posts.
    pub fn normalize(&self, body: &[u8]) -> Result<Vec<Post>> {
        let statuses: Vec<RawStatus> = serde_json::from_slice(body)
            .map_err(|e| TweetstatsError::FeedParse(e.to_string()))?;

        statuses.into_iter().map(Self::to_post).collect()
    }

    fn to_post(status: RawStatus) -> Result<Post> {
        let created_at = parse_created_at(&status.created_at)?;
        let text = status.full_text.or(status.text).unwrap_or_default();

        Ok(Post {
            author_handle: status.user.screen_name,
            author_display_name: status.user.name,
            text: decode_html_entities(&text).to_string(),
            created_at,
            source: status.source,
            author_total_posts: status.user.statuses_count,
            author_followers: status.user.followers_count,
        })
    }
}

pub fn parse_created_at(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(s, CREATED_AT_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TweetstatsError::FeedParse(format!("bad created_at {s:?}: {e}")))
}
