//! # domains
//!
//! Entities, ports, and errors shared by every crate in the campus feed
//! client. No I/O lives here.

pub mod error;
pub mod media;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::{Error, Result};
pub use media::{MediaItem, MediaKind};
pub use models::*;
pub use ports::FeedBackend;

#[cfg(any(test, feature = "testing"))]
pub use ports::MockFeedBackend;
