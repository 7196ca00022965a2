//! # api-adapters
//!
//! The HTTP edge of the campus feed client: wire DTOs, the response
//! envelope, and the reqwest implementation of the `FeedBackend` port.

pub mod dto;
pub mod envelope;
pub mod rest;

// Re-exporting for easier access in other crates
pub use envelope::{Envelope, VoidEnvelope, SUCCESS_CODE};
pub use rest::{HttpFeedBackend, DEFAULT_TIMEOUT};
