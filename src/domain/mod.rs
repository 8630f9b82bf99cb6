pub mod post;
pub mod stat;

pub use post::{FeedSnapshot, Post};
pub use stat::StatEntry;
