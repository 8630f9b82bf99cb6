use chrono::{DateTime, Utc};

/// One fetched post with its author's metadata at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub author_handle: String,
    pub author_display_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Raw source markup as returned by the API, e.g.
    /// `<a href="https://mobile.twitter.com" rel="nofollow">Twitter Web App</a>`.
    pub source: String,
    pub author_total_posts: u64,
    pub author_followers: u64,
}

impl Post {
    /// Label used by every per-author statistic: `"{handle} ({display_name})"`.
    pub fn author_label(&self) -> String {
        format!("{} ({})", self.author_handle, self.author_display_name)
    }
}

/// Posts fetched once per sign-in, in fetch order.
///
/// Pages are concatenated as received; a post that shifts across a page
/// boundary between two requests shows up twice.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    posts: Vec<Post>,
    pub fetched_at: DateTime<Utc>,
}

impl FeedSnapshot {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            fetched_at: Utc::now(),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
