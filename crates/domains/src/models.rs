//! # Domain Models
//!
//! Core entities of the campus feed as the client sees them. Wire DTOs live
//! in the adapter crate; everything here is already converted, with media
//! kinds decided and wire flags widened to real types.

use chrono::NaiveDateTime;

use crate::media::MediaItem;

/// Backend identifiers are 64-bit integers.
pub type PostId = i64;
pub type CommentId = i64;
pub type UserId = i64;
pub type CircleId = i64;

/// The viewer's identity, injected into the controller at construction.
///
/// Replaces the ambient preference-store lookup: anything that needs to know
/// who is browsing gets handed this explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Post author reference as embedded in feed payloads.
///
/// The display name is denormalized server-side and may be missing on
/// older rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub name: Option<String>,
}

/// Post flavor. The backend stores free-form strings; anything it grows
/// beyond these two is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKind {
    Normal,
    Question,
    Other(String),
}

impl PostKind {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "normal" => Self::Normal,
            "question" => Self::Question,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Normal => "normal",
            Self::Question => "question",
            Self::Other(raw) => raw,
        }
    }
}

/// Who can see a post: everyone, or members of one circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Circle(CircleId),
}

impl Visibility {
    /// Wire form: the literal `"public"` or the circle id as a string,
    /// with the circle id repeated in a dedicated field.
    pub fn from_wire(raw: &str, circle_id: Option<CircleId>) -> Self {
        if raw == "public" {
            return Self::Public;
        }
        match circle_id.or_else(|| raw.parse().ok()) {
            Some(id) => Self::Circle(id),
            None => Self::Public,
        }
    }

    pub fn as_wire(&self) -> String {
        match self {
            Self::Public => "public".to_string(),
            Self::Circle(id) => id.to_string(),
        }
    }

    pub fn circle_id(&self) -> Option<CircleId> {
        match self {
            Self::Public => None,
            Self::Circle(id) => Some(*id),
        }
    }
}

/// A feed post with its server-snapshot counters.
///
/// The counters here are whatever the backend last reported; the effective
/// like count shown to the viewer may differ while a local toggle is
/// pending (see the controller's `LikeState`).
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub author: Author,
    pub content: String,
    /// Media in display order, kind decided once at ingestion.
    pub media: Vec<MediaItem>,
    pub kind: PostKind,
    pub visibility: Visibility,
    pub like_count: i32,
    pub comment_count: i32,
    pub share_count: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    /// Soft-delete marker; the backend filters these from feed pages but
    /// they can still surface in direct fetches.
    pub deleted: bool,
}

/// Editable fields of a post, sent on update.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub content: String,
    pub media: Vec<MediaItem>,
    pub kind: PostKind,
    pub visibility: Visibility,
}

/// A comment, optionally carrying its replies.
///
/// Threading is two-level: a top-level comment holds a flat list of
/// replies, and replies never nest further.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: Author,
    pub content: String,
    pub parent_id: Option<CommentId>,
    pub created_at: Option<NaiveDateTime>,
    pub reply_count: i32,
    pub replies: Vec<Comment>,
}

/// What a report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    Post(PostId),
    Comment(CommentId),
    User(UserId),
}

impl ReportTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Comment(_) => "comment",
            Self::User(_) => "user",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Post(id) | Self::Comment(id) | Self::User(id) => *id,
        }
    }
}

/// Closed set of report reasons offered by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportReason {
    Spam,
    SexualContent,
    IllegalContent,
    Scam,
    Harassment,
    PrivacyViolation,
    Other,
}

impl ReportReason {
    /// Every reason, in the order the picker presents them.
    pub const ALL: [ReportReason; 7] = [
        Self::Spam,
        Self::SexualContent,
        Self::IllegalContent,
        Self::Scam,
        Self::Harassment,
        Self::PrivacyViolation,
        Self::Other,
    ];

    /// The label is also the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spam => "Spam",
            Self::SexualContent => "Sexual content",
            Self::IllegalContent => "Illegal content",
            Self::Scam => "Scam",
            Self::Harassment => "Harassment",
            Self::PrivacyViolation => "Privacy violation",
            Self::Other => "Other",
        }
    }
}

/// A one-shot report submission. No local state outlives the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub target: ReportTarget,
    pub reason: ReportReason,
    pub description: Option<String>,
}
