//! # Error Taxonomy
//!
//! Every failure a caller can see, each with a message fit for direct
//! display. Nothing here is fatal: the screen stays usable and the user may
//! simply retry the action that failed.

use thiserror::Error;

use crate::models::PostId;

/// The primary error type for all client operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transport failure: no connectivity, timeout, connection reset.
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-200 envelope code.
    #[error("request rejected (code {code}): {message}")]
    Api { code: i32, message: String },

    /// The body did not match the envelope or payload shape.
    #[error("malformed server response: {0}")]
    Decode(String),

    /// Rejected locally before any network call was issued.
    #[error("{0}")]
    Validation(String),

    /// A like toggle referenced a post that is not in the local list.
    #[error("post {0} is not in the current feed")]
    UnknownPost(PostId),
}

impl Error {
    /// Shorthand for validation failures.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// A specialized Result for client operations.
pub type Result<T> = std::result::Result<T, Error>;
