//! Reduces a feed snapshot to a label → count table.
//!
//! Tables are insertion ordered. Writing to an existing label replaces its
//! count but keeps the position where the label was first seen, which is the
//! tie-break order the ranker preserves.

use indexmap::IndexMap;

use crate::app::Result;
use crate::domain::Post;
use crate::stats::client::client_name;

pub type CountTable = IndexMap<String, u64>;

/// Which dimension a table is built along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Posts per author in the snapshot.
    PostsPerAuthor,
    /// Authors per client, using the last client each author was seen with.
    AuthorsPerClient,
    /// Each author's lifetime post count, last value seen wins.
    AuthorTotalPosts,
    /// Each author's follower count, last value seen wins.
    AuthorFollowers,
}

pub fn aggregate(posts: &[Post], policy: Policy) -> Result<CountTable> {
    match policy {
        Policy::PostsPerAuthor => Ok(count_by_author(posts)),
        Policy::AuthorsPerClient => count_by_client(posts),
        Policy::AuthorTotalPosts => Ok(author_total_posts(posts)),
        Policy::AuthorFollowers => Ok(author_followers(posts)),
    }
}

pub fn count_by_author(posts: &[Post]) -> CountTable {
    let mut table = CountTable::new();
    for post in posts {
        *table.entry(post.author_label()).or_insert(0) += 1;
    }
    table
}

/// Counts distinct authors per client.
///
/// An author who posted from several clients is attributed only to the client
/// of their last post in snapshot order.
pub fn count_by_client(posts: &[Post]) -> Result<CountTable> {
    let mut author_client: IndexMap<String, &str> = IndexMap::new();
    for post in posts {
        author_client.insert(post.author_label(), client_name(&post.source)?);
    }

    let mut table = CountTable::new();
    for client in author_client.values() {
        *table.entry((*client).to_string()).or_insert(0) += 1;
    }
    Ok(table)
}

pub fn author_total_posts(posts: &[Post]) -> CountTable {
    last_value_per_author(posts, |post| post.author_total_posts)
}

pub fn author_followers(posts: &[Post]) -> CountTable {
    last_value_per_author(posts, |post| post.author_followers)
}

fn last_value_per_author(posts: &[Post], value: impl Fn(&Post) -> u64) -> CountTable {
    let mut table = CountTable::new();
    for post in posts {
        table.insert(post.author_label(), value(post));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TweetstatsError;
    use chrono::Utc;

    fn post(handle: &str, client: &str, total_posts: u64, followers: u64) -> Post {
        Post {
            author_handle: handle.into(),
            author_display_name: handle.to_uppercase(),
            text: String::new(),
            created_at: Utc::now(),
            source: format!("<a href=\"https://example.com\" rel=\"nofollow\">{client}</a>"),
            author_total_posts: total_posts,
            author_followers: followers,
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post("a", "Web", 2, 10),
            post("b", "Mobile", 7, 3),
            post("a", "Web", 2, 10),
            post("c", "Web", 1, 99),
            post("b", "Mobile", 7, 3),
            post("a", "Web", 2, 10),
        ]
    }

    #[test]
    fn test_count_by_author_repeated_author() {
        let posts = vec![post("a", "Web", 2, 0), post("b", "Web", 2, 0), post("a", "Web", 2, 0)];
        let table = count_by_author(&posts);

        let rows: Vec<(&str, u64)> = table.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(rows, vec![("a (A)", 2), ("b (B)", 1)]);
    }

    #[test]
    fn test_count_by_author_sums_to_post_count() {
        let posts = sample();
        let table = count_by_author(&posts);
        assert_eq!(table.values().sum::<u64>(), posts.len() as u64);
    }

    #[test]
    fn test_count_by_author_labels_are_distinct_authors() {
        let table = count_by_author(&sample());
        let labels: Vec<&str> = table.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["a (A)", "b (B)", "c (C)"]);
        assert!(table.values().all(|count| *count >= 1));
    }

    #[test]
    fn test_count_by_client_counts_authors_not_posts() {
        let table = count_by_client(&sample()).unwrap();
        assert_eq!(table.get("Web"), Some(&2));
        assert_eq!(table.get("Mobile"), Some(&1));
    }

    #[test]
    fn test_count_by_client_insertion_order() {
        let posts = vec![post("x", "Web", 0, 0), post("y", "Mobile", 0, 0)];
        let table = count_by_client(&posts).unwrap();

        let rows: Vec<(&str, u64)> = table.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(rows, vec![("Web", 1), ("Mobile", 1)]);
    }

    #[test]
    fn test_count_by_client_last_client_wins() {
        let posts = vec![
            post("x", "Web", 0, 0),
            post("x", "Web", 0, 0),
            post("x", "Mobile", 0, 0),
        ];
        let table = count_by_client(&posts).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Mobile"), Some(&1));
        assert_eq!(table.get("Web"), None);
    }

    #[test]
    fn test_count_by_client_propagates_malformed_source() {
        let mut bad = post("x", "Web", 0, 0);
        bad.source = "web".into();

        let result = count_by_client(&[post("y", "Web", 0, 0), bad]);
        assert!(matches!(result, Err(TweetstatsError::MalformedSource(_))));
    }

    #[test]
    fn test_author_followers_last_value_wins() {
        let posts = vec![post("z", "Web", 0, 10), post("z", "Web", 0, 50)];
        let table = author_followers(&posts);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("z (Z)"), Some(&50));
    }

    #[test]
    fn test_author_total_posts_is_passthrough() {
        let table = author_total_posts(&sample());
        assert_eq!(table.get("a (A)"), Some(&2));
        assert_eq!(table.get("b (B)"), Some(&7));
        assert_eq!(table.get("c (C)"), Some(&1));
    }

    #[test]
    fn test_empty_snapshot_yields_empty_tables() {
        for policy in [
            Policy::PostsPerAuthor,
            Policy::AuthorsPerClient,
            Policy::AuthorTotalPosts,
            Policy::AuthorFollowers,
        ] {
            assert!(aggregate(&[], policy).unwrap().is_empty());
        }
    }
}
