//! Statistics computed from a feed snapshot.

pub mod aggregator;
pub mod client;
pub mod ranker;

use std::fmt;
use std::str::FromStr;

use crate::app::Result;
use crate::domain::{FeedSnapshot, StatEntry};

pub use aggregator::{aggregate, CountTable, Policy};
pub use client::client_name;
pub use ranker::{rank, rank_entries};

/// A ranked table ready for display.
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub heading: &'static str,
    pub entries: Vec<StatEntry>,
}

/// The statistics pages, each backed by one aggregation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsView {
    TopUsers,
    TopClients,
    TopTweeters,
    TopFollowers,
}

impl StatsView {
    pub const ALL: [StatsView; 4] = [
        StatsView::TopUsers,
        StatsView::TopClients,
        StatsView::TopTweeters,
        StatsView::TopFollowers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatsView::TopUsers => "topusers",
            StatsView::TopClients => "topclients",
            StatsView::TopTweeters => "toptweeters",
            StatsView::TopFollowers => "topfollowers",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            StatsView::TopUsers => "Tweets per user in your feed",
            StatsView::TopClients => "Twitter clients used in your feed",
            StatsView::TopTweeters => "Users in your feed sorted by total tweets overall",
            StatsView::TopFollowers => "Users in your feed sorted by total followers",
        }
    }

    pub fn policy(self) -> Policy {
        match self {
            StatsView::TopUsers => Policy::PostsPerAuthor,
            StatsView::TopClients => Policy::AuthorsPerClient,
            StatsView::TopTweeters => Policy::AuthorTotalPosts,
            StatsView::TopFollowers => Policy::AuthorFollowers,
        }
    }

    pub fn report(self, snapshot: &FeedSnapshot) -> Result<StatsReport> {
        let table = aggregate(snapshot.posts(), self.policy())?;
        Ok(StatsReport {
            heading: self.heading(),
            entries: rank(&table),
        })
    }
}

impl fmt::Display for StatsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatsView {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        StatsView::ALL
            .into_iter()
            .find(|view| view.name() == s)
            .ok_or_else(|| format!("Unknown view: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Post;
    use chrono::Utc;

    fn post(handle: &str, client: &str, followers: u64) -> Post {
        Post {
            author_handle: handle.into(),
            author_display_name: handle.into(),
            text: String::new(),
            created_at: Utc::now(),
            source: format!("<a href=\"https://example.com\">{client}</a>"),
            author_total_posts: 1,
            author_followers: followers,
        }
    }

    #[test]
    fn test_view_names_round_trip() {
        for view in StatsView::ALL {
            assert_eq!(view.name().parse::<StatsView>().unwrap(), view);
        }
        assert!("recent".parse::<StatsView>().is_err());
    }

    #[test]
    fn test_report_ranks_followers() {
        let snapshot = FeedSnapshot::new(vec![
            post("small", "Web", 5),
            post("big", "Web", 500),
            post("mid", "Mobile", 50),
        ]);

        let report = StatsView::TopFollowers.report(&snapshot).unwrap();
        assert_eq!(report.heading, "Users in your feed sorted by total followers");

        let lines: Vec<String> = report.entries.iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["500 big (big)", "50 mid (mid)", "5 small (small)"]);
    }

    #[test]
    fn test_every_view_on_empty_snapshot() {
        let snapshot = FeedSnapshot::default();
        for view in StatsView::ALL {
            assert!(view.report(&snapshot).unwrap().entries.is_empty());
        }
    }
}
