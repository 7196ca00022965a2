//! # Wire DTOs
//!
//! The backend's camelCase JSON shapes, kept separate from the domain
//! models so conversion happens exactly once at the boundary. Media URLs
//! arrive as a JSON-encoded string array inside a string field; they are
//! decoded and typed here, never downstream.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use domains::media;
use domains::models::{Author, Comment, Post, PostDraft, PostKind, Report, Visibility};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: i64,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_urls: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub visibility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle_id: Option<i64>,
    pub likes_count: i32,
    pub comments_count: i32,
    pub shares_count: i32,
    #[serde(default)]
    pub create_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub update_time: Option<NaiveDateTime>,
    /// Soft-delete marker, `0` or `1` on the wire.
    #[serde(default)]
    pub deleted: i32,
}

impl PostDto {
    pub fn into_domain(self) -> Post {
        let media = match self.media_urls.as_deref() {
            None | Some("") => Vec::new(),
            Some(raw) => media::parse_media_urls(raw).unwrap_or_else(|err| {
                warn!(post_id = self.id, error = %err, "unparseable media payload, dropping");
                Vec::new()
            }),
        };
        Post {
            id: self.id,
            author: Author {
                id: self.user_id,
                name: self.username,
            },
            content: self.content,
            media,
            kind: PostKind::from_wire(&self.kind),
            visibility: Visibility::from_wire(&self.visibility, self.circle_id),
            like_count: self.likes_count,
            comment_count: self.comments_count,
            share_count: self.shares_count,
            created_at: self.create_time,
            updated_at: self.update_time,
            deleted: self.deleted != 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<i64>,
    #[serde(default)]
    pub create_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<CommentDto>>,
    #[serde(default)]
    pub reply_count: i32,
}

impl CommentDto {
    pub fn into_domain(self) -> Comment {
        Comment {
            id: self.id,
            post_id: self.post_id,
            author: Author {
                id: self.user_id,
                name: self.username,
            },
            content: self.content,
            parent_id: self.parent_comment_id,
            created_at: self.create_time,
            reply_count: self.reply_count,
            replies: self
                .replies
                .unwrap_or_default()
                .into_iter()
                .map(CommentDto::into_domain)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_urls: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub visibility: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle_id: Option<i64>,
}

impl UpdatePostRequest {
    pub fn from_draft(draft: &PostDraft) -> Self {
        Self {
            content: draft.content.clone(),
            media_urls: if draft.media.is_empty() {
                None
            } else {
                Some(media::encode_media_urls(&draft.media))
            },
            kind: draft.kind.as_wire().to_string(),
            visibility: draft.visibility.as_wire(),
            circle_id: draft.visibility.circle_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub reported_type: String,
    pub reported_id: i64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ReportRequest {
    pub fn from_domain(report: &Report) -> Self {
        Self {
            reported_type: report.target.kind().to_string(),
            reported_id: report.target.id(),
            reason: report.reason.as_str().to_string(),
            description: report.description.clone(),
        }
    }
}
