//! # Feed Interaction Controller
//!
//! Owns the view state for one feed screen and reconciles it with the
//! backend: optimistic like toggles with rollback, full-reload comment
//! submission, local removal on delete, fire-and-forget reports.
//!
//! Threading model: state sits behind a mutex that is only ever taken for
//! synchronous mutation and never held across an await, so UI-spawned tasks may
//! call into the controller concurrently. Rapid double-taps on the same
//! post are absorbed by the in-flight guard rather than racing.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use domains::models::{
    CommentId, Post, PostDraft, PostId, Report, ReportReason, ReportTarget, Session,
};
use domains::ports::FeedBackend;
use domains::{Error, Result};

use crate::comments;
use crate::state::{BeginToggle, FeedState, LikeState, PostDetail, ToggleDirection};

/// Feed page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// What a [`FeedController::toggle_like`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The toggle went through; this is the settled like state.
    Applied(LikeState),
    /// Dropped: a toggle for this post was already in flight.
    InFlight,
}

/// Per-screen controller over the feed backend port.
pub struct FeedController {
    backend: Arc<dyn FeedBackend>,
    session: Session,
    page_size: u32,
    state: Mutex<FeedState>,
}

impl FeedController {
    pub fn new(backend: Arc<dyn FeedBackend>, session: Session) -> Self {
        Self {
            backend,
            session,
            page_size: DEFAULT_PAGE_SIZE,
            state: Mutex::new(FeedState::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn session(&self) -> Session {
        self.session
    }

    /// Whether the session user may edit or delete the post; everyone
    /// else only gets to report it.
    pub fn can_modify(&self, post: &Post) -> bool {
        post.author.id == self.session.user_id
    }

    /// Snapshot of the current post list, in display order.
    pub fn posts(&self) -> Vec<Post> {
        self.state().posts().to_vec()
    }

    /// The effective like state for a post, if it is in the list.
    pub fn like_state(&self, post_id: PostId) -> Option<LikeState> {
        self.state().like_state(post_id)
    }

    /// Snapshot of the open post detail, if any.
    pub fn detail(&self) -> Option<PostDetail> {
        self.state().detail().cloned()
    }

    /// Reloads page one and replaces the entire local list.
    ///
    /// On failure prior state is left untouched. Like-status probes are
    /// best-effort: a failed probe defaults that post to not-liked.
    pub async fn load(&self) -> Result<Vec<Post>> {
        debug!(page = 1, size = self.page_size, "loading feed");
        let posts = self.backend.fetch_posts(1, self.page_size).await?;
        let statuses = self.probe_like_statuses(&posts).await;
        let mut state = self.state();
        state.replace_posts(posts, statuses);
        Ok(state.posts().to_vec())
    }

    /// Fetches the next page and appends it. Returns only the newly added
    /// posts; ids already present are skipped.
    pub async fn load_more(&self) -> Result<Vec<Post>> {
        let page = self.state().next_page();
        debug!(page, size = self.page_size, "loading further feed page");
        let posts = self.backend.fetch_posts(page, self.page_size).await?;
        let statuses = self.probe_like_statuses(&posts).await;
        Ok(self.state().append_posts(posts, statuses))
    }

    /// Flips the like state of a post optimistically, then reconciles.
    ///
    /// The flip is visible before the request leaves; on failure the
    /// pre-toggle state is restored and the error surfaces. A toggle
    /// arriving while another is in flight for the same post is dropped.
    pub async fn toggle_like(&self, post_id: PostId) -> Result<ToggleOutcome> {
        let pending = match self.state().begin_toggle(post_id)? {
            BeginToggle::Started(pending) => pending,
            BeginToggle::InFlight => {
                debug!(post_id, "like toggle dropped, one already in flight");
                return Ok(ToggleOutcome::InFlight);
            }
        };
        let call = match pending.direction {
            ToggleDirection::Like => self.backend.like_post(post_id).await,
            ToggleDirection::Unlike => self.backend.unlike_post(post_id).await,
        };
        match call {
            Ok(()) => {
                let settled = self.state().complete_toggle(pending, true);
                Ok(ToggleOutcome::Applied(settled))
            }
            Err(err) => {
                warn!(post_id, error = %err, "like toggle failed, rolling back");
                self.state().complete_toggle(pending, false);
                Err(err)
            }
        }
    }

    /// Fetches a post and its comments, threads them, and stores the
    /// result as the open detail.
    pub async fn open_detail(&self, post_id: PostId) -> Result<PostDetail> {
        let post = self.backend.fetch_post(post_id).await?;
        let fetched = self.backend.fetch_comments(post_id).await?;
        let detail = PostDetail {
            post,
            comments: comments::thread(fetched),
        };
        self.state().set_detail(detail.clone());
        Ok(detail)
    }

    /// Posts a top-level comment, then reloads the detail in full.
    ///
    /// No optimistic insert: comment ids and ordering are the server's to
    /// decide, and guessing them locally invites mismatches.
    pub async fn submit_comment(&self, post_id: PostId, text: &str) -> Result<PostDetail> {
        let text = Self::validated_text(text)?;
        self.backend.add_comment(post_id, text).await?;
        self.open_detail(post_id).await
    }

    /// Posts a reply to an existing comment, then reloads the detail.
    pub async fn submit_reply(
        &self,
        post_id: PostId,
        parent_id: CommentId,
        text: &str,
    ) -> Result<PostDetail> {
        let text = Self::validated_text(text)?;
        self.backend.reply_to_comment(parent_id, text).await?;
        self.open_detail(post_id).await
    }

    /// Deletes a post; on success it leaves the local list immediately.
    pub async fn delete_post(&self, post_id: PostId) -> Result<()> {
        self.backend.delete_post(post_id).await?;
        self.state().remove_post(post_id);
        debug!(post_id, "post deleted and removed locally");
        Ok(())
    }

    /// Deletes a comment; on success it leaves the open detail's tree.
    pub async fn delete_comment(&self, comment_id: CommentId) -> Result<()> {
        self.backend.delete_comment(comment_id).await?;
        self.state().remove_comment(comment_id);
        Ok(())
    }

    /// Edits a post; the server's version replaces the local entry.
    pub async fn update_post(&self, post_id: PostId, draft: PostDraft) -> Result<Post> {
        let updated = self.backend.update_post(post_id, draft).await?;
        self.state().replace_post(updated.clone());
        Ok(updated)
    }

    /// Files a report. Purely informational: nothing local changes on
    /// success, and a missing reason never reaches the network.
    pub async fn report(
        &self,
        target: ReportTarget,
        reason: Option<ReportReason>,
        description: Option<&str>,
    ) -> Result<()> {
        let Some(reason) = reason else {
            return Err(Error::validation("select a report reason"));
        };
        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(String::from);
        self.backend
            .submit_report(Report {
                target,
                reason,
                description,
            })
            .await
    }

    fn validated_text(text: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("comment text must not be blank"));
        }
        Ok(trimmed.to_string())
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().expect("feed state lock poisoned")
    }
}

impl std::fmt::Debug for FeedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedController")
            .field("session", &self.session)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
