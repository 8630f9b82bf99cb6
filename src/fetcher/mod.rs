pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::FeedSnapshot;
use crate::oauth::AccessToken;

/// Source of the signed-in user's home timeline.
#[async_trait]
pub trait TimelineSource {
    /// Fetches the bounded set of timeline pages in one go.
    ///
    /// A failure means no snapshot exists for the session.
    async fn fetch_feed_snapshot(&self, token: &AccessToken) -> Result<FeedSnapshot>;
}
