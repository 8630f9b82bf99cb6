//! # tweetstats
//!
//! A small web application that signs a user in to the Twitter API, fetches
//! their recent home timeline once, and shows simple statistics about it.
//!
//! ## Architecture
//!
//! ```text
//! OAuth → Fetcher → Normalizer → Session snapshot → Aggregator → Ranker → HTML
//! ```
//!
//! - [`oauth`]: OAuth 1.0a signing and the three-legged sign-in flow
//! - [`fetcher`]: Home timeline pages fetched with the user's access token
//! - [`normalizer`]: Converts API statuses to [`Post`](domain::Post)s
//! - [`session`]: Per-browser session holding the fetched snapshot
//! - [`stats`]: Aggregation and ranking of the snapshot
//! - [`web`]: axum routes and HTML rendering
//!
//! ## Quick Start
//!
//! ```bash
//! # Configure consumer credentials
//! export TWEETSTATS_CONSUMER_KEY=...
//! export TWEETSTATS_CONSUMER_SECRET=...
//!
//! # Run the server and sign in at http://127.0.0.1:5000/
//! tweetstats serve
//!
//! # Print statistics for a saved timeline response
//! tweetstats report home_timeline.json
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config, store,
/// OAuth client, timeline fetcher and sessions.
pub mod app;

/// Command-line interface using clap.
///
/// - `serve` - Run the web server
/// - `report <path>` - Print statistics for a saved timeline
/// - `db` - Record and list database ticks
pub mod cli;

/// Configuration loaded from `~/.config/tweetstats/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Post`](domain::Post): One fetched post with author metadata
/// - [`FeedSnapshot`](domain::FeedSnapshot): The posts fetched for a session
/// - [`StatEntry`](domain::StatEntry): One row of a statistics table
pub mod domain;

/// Home timeline fetching.
///
/// - [`TimelineSource`](fetcher::TimelineSource): Async trait for snapshot fetching
/// - [`HttpTimelineClient`](fetcher::http_fetcher::HttpTimelineClient): reqwest-based implementation
pub mod fetcher;

/// API status parsing and normalization.
pub mod normalizer;

/// OAuth 1.0a sign-in.
pub mod oauth;

/// Session storage keyed by cookie.
pub mod session;

/// Aggregation and ranking of feed snapshots.
pub mod stats;

/// SQLite store backing the `/db` check.
pub mod store;

/// HTTP server.
pub mod web;
