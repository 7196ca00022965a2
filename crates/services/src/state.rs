//! # Feed State
//!
//! The synchronous heart of the feed screen: post list, per-post like
//! state, the in-flight toggle guard, and the open post detail. Everything
//! here is pure bookkeeping; the async controller drives it and never
//! holds the surrounding lock across an await.

use std::collections::{HashMap, HashSet};

use domains::models::{Comment, CommentId, Post, PostId};

/// The like state shown to the viewer for one post.
///
/// Invariant: always a function of the server-snapshot count and the
/// pending local toggle delta. It is rebuilt from scratch on every full
/// reload and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub count: i32,
}

/// Which backend call a toggle maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleDirection {
    Like,
    Unlike,
}

/// A toggle that has been applied locally and awaits its round-trip.
///
/// Carries the pre-toggle snapshot; rollback means writing it back.
#[derive(Debug, Clone, Copy)]
pub struct PendingToggle {
    pub post_id: PostId,
    pub direction: ToggleDirection,
    snapshot: LikeState,
}

/// Outcome of asking the state machine to start a toggle.
#[derive(Debug, Clone, Copy)]
pub enum BeginToggle {
    /// The optimistic flip is applied; issue the backend call and report
    /// back through [`FeedState::complete_toggle`].
    Started(PendingToggle),
    /// A toggle for this post is already in flight; the request is dropped.
    InFlight,
}

/// The currently opened post with its threaded comments.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post: Post,
    /// Top-level comments, each carrying its (flat) replies.
    pub comments: Vec<Comment>,
}

/// In-memory view state for one feed screen instance.
#[derive(Debug, Default)]
pub struct FeedState {
    posts: Vec<Post>,
    likes: HashMap<PostId, LikeState>,
    in_flight: HashSet<PostId>,
    pages_loaded: u32,
    detail: Option<PostDetail>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, post_id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn like_state(&self, post_id: PostId) -> Option<LikeState> {
        self.likes.get(&post_id).copied()
    }

    pub fn detail(&self) -> Option<&PostDetail> {
        self.detail.as_ref()
    }

    /// The page number a `load_more` should fetch next.
    pub fn next_page(&self) -> u32 {
        self.pages_loaded + 1
    }

    /// Replaces the whole list after a successful reload.
    ///
    /// Stale like overrides and in-flight markers are dropped wholesale;
    /// `statuses` pairs with `posts` by index and seeds the fresh map.
    pub fn replace_posts(&mut self, posts: Vec<Post>, statuses: Vec<bool>) {
        self.likes.clear();
        self.in_flight.clear();
        for (post, liked) in posts.iter().zip(statuses) {
            self.likes.insert(
                post.id,
                LikeState {
                    liked,
                    count: post.like_count,
                },
            );
        }
        self.posts = posts;
        self.pages_loaded = 1;
    }

    /// Appends a further page, skipping ids already present. Returns the
    /// posts that were actually added.
    pub fn append_posts(&mut self, posts: Vec<Post>, statuses: Vec<bool>) -> Vec<Post> {
        let mut appended = Vec::new();
        for (post, liked) in posts.into_iter().zip(statuses) {
            if self.post(post.id).is_some() {
                continue;
            }
            self.likes.insert(
                post.id,
                LikeState {
                    liked,
                    count: post.like_count,
                },
            );
            self.posts.push(post.clone());
            appended.push(post);
        }
        self.pages_loaded += 1;
        appended
    }

    /// Starts a like toggle: checks preconditions, applies the optimistic
    /// flip, and marks the post in flight.
    pub fn begin_toggle(&mut self, post_id: PostId) -> domains::Result<BeginToggle> {
        let server_count = self
            .post(post_id)
            .map(|post| post.like_count)
            .ok_or(domains::Error::UnknownPost(post_id))?;
        if self.in_flight.contains(&post_id) {
            return Ok(BeginToggle::InFlight);
        }
        let snapshot = *self.likes.entry(post_id).or_insert(LikeState {
            liked: false,
            count: server_count,
        });
        let direction = if snapshot.liked {
            ToggleDirection::Unlike
        } else {
            ToggleDirection::Like
        };
        let delta = if snapshot.liked { -1 } else { 1 };
        self.likes.insert(
            post_id,
            LikeState {
                liked: !snapshot.liked,
                count: snapshot.count + delta,
            },
        );
        self.in_flight.insert(post_id);
        Ok(BeginToggle::Started(PendingToggle {
            post_id,
            direction,
            snapshot,
        }))
    }

    /// Finishes a toggle round-trip. On failure the pre-toggle snapshot is
    /// restored; on success the optimistic state is already correct.
    /// Returns the state now effective for the post.
    pub fn complete_toggle(&mut self, pending: PendingToggle, success: bool) -> LikeState {
        self.in_flight.remove(&pending.post_id);
        if !success && self.likes.contains_key(&pending.post_id) {
            self.likes.insert(pending.post_id, pending.snapshot);
        }
        self.likes
            .get(&pending.post_id)
            .copied()
            .unwrap_or(pending.snapshot)
    }

    pub fn toggle_in_flight(&self, post_id: PostId) -> bool {
        self.in_flight.contains(&post_id)
    }

    /// Drops a post and everything hanging off it.
    pub fn remove_post(&mut self, post_id: PostId) {
        self.posts.retain(|post| post.id != post_id);
        self.likes.remove(&post_id);
        self.in_flight.remove(&post_id);
        if self
            .detail
            .as_ref()
            .is_some_and(|detail| detail.post.id == post_id)
        {
            self.detail = None;
        }
    }

    /// Swaps in an updated post, keeping the viewer's liked flag but
    /// adopting the fresh server count unless a toggle is mid-flight.
    pub fn replace_post(&mut self, updated: Post) {
        if !self.in_flight.contains(&updated.id) {
            if let Some(state) = self.likes.get_mut(&updated.id) {
                state.count = updated.like_count;
            }
        }
        if let Some(slot) = self.posts.iter_mut().find(|post| post.id == updated.id) {
            *slot = updated.clone();
        }
        if let Some(detail) = self.detail.as_mut() {
            if detail.post.id == updated.id {
                detail.post = updated;
            }
        }
    }

    pub fn set_detail(&mut self, detail: PostDetail) {
        self.detail = Some(detail);
    }

    /// Removes a comment from the open detail; a top-level comment takes
    /// its reply subtree with it. Returns whether anything was removed.
    pub fn remove_comment(&mut self, comment_id: CommentId) -> bool {
        let Some(detail) = self.detail.as_mut() else {
            return false;
        };
        let before = detail.comments.len();
        detail.comments.retain(|comment| comment.id != comment_id);
        if detail.comments.len() != before {
            return true;
        }
        for comment in detail.comments.iter_mut() {
            let replies_before = comment.replies.len();
            comment.replies.retain(|reply| reply.id != comment_id);
            if comment.replies.len() != replies_before {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::{Author, PostKind, Visibility};

    fn post(id: PostId, like_count: i32) -> Post {
        Post {
            id,
            author: Author {
                id: 7,
                name: Some("wei".to_string()),
            },
            content: format!("post {id}"),
            media: Vec::new(),
            kind: PostKind::Normal,
            visibility: Visibility::Public,
            like_count,
            comment_count: 0,
            share_count: 0,
            created_at: None,
            updated_at: None,
            deleted: false,
        }
    }

    fn loaded(posts: Vec<Post>) -> FeedState {
        let statuses = vec![false; posts.len()];
        let mut state = FeedState::new();
        state.replace_posts(posts, statuses);
        state
    }

    #[test]
    fn toggle_applies_optimistically_and_confirms() {
        let mut state = loaded(vec![post(1, 5)]);
        let BeginToggle::Started(pending) = state.begin_toggle(1).unwrap() else {
            panic!("expected a started toggle");
        };
        assert_eq!(pending.direction, ToggleDirection::Like);
        assert_eq!(
            state.like_state(1),
            Some(LikeState {
                liked: true,
                count: 6
            })
        );
        let settled = state.complete_toggle(pending, true);
        assert_eq!(
            settled,
            LikeState {
                liked: true,
                count: 6
            }
        );
        assert!(!state.toggle_in_flight(1));
    }

    #[test]
    fn failed_toggle_rolls_back_to_the_snapshot() {
        let mut state = loaded(vec![post(1, 5)]);
        // First toggle succeeds: 5/false -> 6/true.
        let BeginToggle::Started(first) = state.begin_toggle(1).unwrap() else {
            panic!("expected a started toggle");
        };
        state.complete_toggle(first, true);
        // Second toggle fails: rollback target is the post-first-toggle
        // state, not the original server snapshot.
        let BeginToggle::Started(second) = state.begin_toggle(1).unwrap() else {
            panic!("expected a started toggle");
        };
        assert_eq!(second.direction, ToggleDirection::Unlike);
        let settled = state.complete_toggle(second, false);
        assert_eq!(
            settled,
            LikeState {
                liked: true,
                count: 6
            }
        );
    }

    #[test]
    fn second_toggle_is_dropped_while_one_is_in_flight() {
        let mut state = loaded(vec![post(1, 5)]);
        let BeginToggle::Started(pending) = state.begin_toggle(1).unwrap() else {
            panic!("expected a started toggle");
        };
        assert!(matches!(state.begin_toggle(1).unwrap(), BeginToggle::InFlight));
        // State reflects the first toggle only.
        assert_eq!(
            state.like_state(1),
            Some(LikeState {
                liked: true,
                count: 6
            })
        );
        state.complete_toggle(pending, true);
        assert!(matches!(
            state.begin_toggle(1).unwrap(),
            BeginToggle::Started(_)
        ));
    }

    #[test]
    fn toggle_against_an_unknown_post_is_rejected() {
        let mut state = loaded(vec![post(1, 5)]);
        assert_eq!(
            state.begin_toggle(99).unwrap_err(),
            domains::Error::UnknownPost(99)
        );
    }

    #[test]
    fn reload_clears_overrides_and_in_flight_markers() {
        let mut state = loaded(vec![post(1, 5)]);
        let BeginToggle::Started(_) = state.begin_toggle(1).unwrap() else {
            panic!("expected a started toggle");
        };
        state.replace_posts(vec![post(1, 9)], vec![true]);
        assert!(!state.toggle_in_flight(1));
        assert_eq!(
            state.like_state(1),
            Some(LikeState {
                liked: true,
                count: 9
            })
        );
    }

    #[test]
    fn append_skips_posts_already_present() {
        let mut state = loaded(vec![post(1, 5), post(2, 0)]);
        let appended = state.append_posts(vec![post(2, 0), post(3, 2)], vec![false, true]);
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].id, 3);
        assert_eq!(state.posts().len(), 3);
        assert_eq!(state.next_page(), 3);
    }

    #[test]
    fn removing_a_post_drops_its_bookkeeping() {
        let mut state = loaded(vec![post(1, 5), post(2, 1)]);
        let BeginToggle::Started(pending) = state.begin_toggle(1).unwrap() else {
            panic!("expected a started toggle");
        };
        state.remove_post(1);
        assert!(state.post(1).is_none());
        assert_eq!(state.like_state(1), None);
        assert!(!state.toggle_in_flight(1));
        // Completing the abandoned round-trip must not resurrect anything.
        let settled = state.complete_toggle(pending, false);
        assert_eq!(settled.count, 5);
        assert_eq!(state.like_state(1), None);
    }
}
