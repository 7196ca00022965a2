//! # REST Adapter
//!
//! `FeedBackend` over HTTPS: one shared reqwest client, bearer-token auth,
//! and the `{code, message, data}` envelope on every response. Calls are
//! one-shot; retrying is the user's tap, not ours.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use domains::models::{Comment, CommentId, Post, PostDraft, PostId, Report};
use domains::ports::FeedBackend;
use domains::{Error, Result};

use crate::dto::{AddCommentRequest, CommentDto, PostDto, ReportRequest, UpdatePostRequest};
use crate::envelope::{Envelope, VoidEnvelope};

/// Matches the client timeout the backend is tuned for.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The reqwest-backed implementation of [`FeedBackend`].
pub struct HttpFeedBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl HttpFeedBackend {
    /// Builds an adapter with the default timeout. The token, when
    /// present, is sent as a bearer credential on every request.
    pub fn new(base_url: impl Into<String>, token: Option<SecretString>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        request
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>> {
        let response = request.send().await.map_err(transport)?;
        response.json::<Envelope<T>>().await.map_err(decode)
    }
}

#[async_trait]
impl FeedBackend for HttpFeedBackend {
    async fn fetch_posts(&self, page: u32, size: u32) -> Result<Vec<Post>> {
        debug!(page, size, "GET /api/posts");
        let envelope: Envelope<Vec<PostDto>> = self
            .execute(
                self.request(Method::GET, "/api/posts")
                    .query(&[("page", page), ("size", size)]),
            )
            .await?;
        Ok(envelope
            .require_data()?
            .into_iter()
            .map(PostDto::into_domain)
            .collect())
    }

    async fn fetch_post(&self, post_id: PostId) -> Result<Post> {
        let envelope: Envelope<PostDto> = self
            .execute(self.request(Method::GET, &format!("/api/posts/{post_id}")))
            .await?;
        Ok(envelope.require_data()?.into_domain())
    }

    async fn fetch_like_status(&self, post_id: PostId) -> Result<bool> {
        let envelope: Envelope<bool> = self
            .execute(self.request(Method::GET, &format!("/api/posts/{post_id}/like/status")))
            .await?;
        envelope.require_data()
    }

    async fn like_post(&self, post_id: PostId) -> Result<()> {
        debug!(post_id, "POST like");
        let envelope: VoidEnvelope = self
            .execute(self.request(Method::POST, &format!("/api/posts/{post_id}/like")))
            .await?;
        envelope.ack()
    }

    async fn unlike_post(&self, post_id: PostId) -> Result<()> {
        debug!(post_id, "DELETE like");
        let envelope: VoidEnvelope = self
            .execute(self.request(Method::DELETE, &format!("/api/posts/{post_id}/like")))
            .await?;
        envelope.ack()
    }

    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let envelope: Envelope<Vec<CommentDto>> = self
            .execute(self.request(Method::GET, &format!("/api/posts/{post_id}/comments")))
            .await?;
        Ok(envelope
            .require_data()?
            .into_iter()
            .map(CommentDto::into_domain)
            .collect())
    }

    async fn add_comment(&self, post_id: PostId, text: String) -> Result<Comment> {
        let envelope: Envelope<CommentDto> = self
            .execute(
                self.request(Method::POST, &format!("/api/posts/{post_id}/comments"))
                    .json(&AddCommentRequest { content: text }),
            )
            .await?;
        Ok(envelope.require_data()?.into_domain())
    }

    async fn reply_to_comment(&self, comment_id: CommentId, text: String) -> Result<Comment> {
        let envelope: Envelope<CommentDto> = self
            .execute(
                self.request(Method::POST, &format!("/api/comments/{comment_id}/reply"))
                    .json(&AddCommentRequest { content: text }),
            )
            .await?;
        Ok(envelope.require_data()?.into_domain())
    }

    async fn update_post(&self, post_id: PostId, draft: PostDraft) -> Result<Post> {
        let envelope: Envelope<PostDto> = self
            .execute(
                self.request(Method::PUT, &format!("/api/posts/{post_id}"))
                    .json(&UpdatePostRequest::from_draft(&draft)),
            )
            .await?;
        Ok(envelope.require_data()?.into_domain())
    }

    async fn delete_post(&self, post_id: PostId) -> Result<()> {
        let envelope: VoidEnvelope = self
            .execute(self.request(Method::DELETE, &format!("/api/posts/{post_id}")))
            .await?;
        envelope.ack()
    }

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()> {
        let envelope: VoidEnvelope = self
            .execute(self.request(Method::DELETE, &format!("/api/comments/{comment_id}")))
            .await?;
        envelope.ack()
    }

    async fn submit_report(&self, report: Report) -> Result<()> {
        debug!(target = report.target.kind(), id = report.target.id(), "POST report");
        let envelope: VoidEnvelope = self
            .execute(
                self.request(Method::POST, "/api/reports")
                    .json(&ReportRequest::from_domain(&report)),
            )
            .await?;
        envelope.ack()
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> Error {
    Error::Decode(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_in_base_url_is_normalized() {
        let backend = HttpFeedBackend::new("http://localhost:8081/", None).unwrap();
        assert_eq!(backend.base_url, "http://localhost:8081");
    }
}
