//! # services
//!
//! Use-case layer of the campus feed client: the feed interaction
//! controller and the pure state machinery it drives.

pub mod comments;
pub mod feed;
pub mod state;

// Re-exporting for easier access in other crates
pub use feed::{FeedController, ToggleOutcome, DEFAULT_PAGE_SIZE};
pub use state::{FeedState, LikeState, PostDetail};
