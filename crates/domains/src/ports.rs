//! # Ports
//!
//! The backend REST API as a typed contract. The adapter crate implements
//! this over HTTP; tests implement it with mockall.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Comment, CommentId, Post, PostDraft, PostId, Report};

/// Everything the feed screen asks of the backend.
///
/// All calls are one-shot: no retry, no backoff. A dropped future simply
/// abandons the request; its eventual completion is ignored.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FeedBackend: Send + Sync {
    /// One page of the feed, newest first, in server order.
    async fn fetch_posts(&self, page: u32, size: u32) -> Result<Vec<Post>>;

    async fn fetch_post(&self, post_id: PostId) -> Result<Post>;

    /// Whether the current viewer has liked the post.
    async fn fetch_like_status(&self, post_id: PostId) -> Result<bool>;

    async fn like_post(&self, post_id: PostId) -> Result<()>;

    async fn unlike_post(&self, post_id: PostId) -> Result<()>;

    /// Top-level comments for a post; replies may arrive nested, flat,
    /// or both. The service layer threads them.
    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>>;

    async fn add_comment(&self, post_id: PostId, text: String) -> Result<Comment>;

    async fn reply_to_comment(&self, comment_id: CommentId, text: String) -> Result<Comment>;

    async fn update_post(&self, post_id: PostId, draft: PostDraft) -> Result<Post>;

    async fn delete_post(&self, post_id: PostId) -> Result<()>;

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()>;

    async fn submit_report(&self, report: Report) -> Result<()>;
}
