//! # Comment Threading
//!
//! The backend returns a post's comments as a mix of top-level entries
//! (sometimes with replies pre-nested) and flat replies carrying a parent
//! id. This module normalizes all of it into the display shape: top-level
//! comments each holding one flat list of replies, never deeper.

use domains::models::Comment;

/// Normalizes a fetched comment list into the two-level display tree.
///
/// Order is preserved as the server sent it. A reply whose parent is not
/// in the list is promoted to top level rather than dropped: showing a
/// comment out of place beats losing it.
pub fn thread(comments: Vec<Comment>) -> Vec<Comment> {
    let mut top: Vec<Comment> = Vec::new();
    let mut pending: Vec<Comment> = Vec::new();

    for mut comment in comments {
        let nested = flatten(std::mem::take(&mut comment.replies));
        if comment.parent_id.is_none() {
            comment.replies = nested;
            top.push(comment);
        } else {
            pending.push(comment);
            pending.extend(nested);
        }
    }

    for reply in pending {
        let parent_id = reply.parent_id;
        let slot = top.iter_mut().find(|candidate| {
            Some(candidate.id) == parent_id
                || candidate
                    .replies
                    .iter()
                    .any(|existing| Some(existing.id) == parent_id)
        });
        match slot {
            Some(parent) => {
                if !parent.replies.iter().any(|existing| existing.id == reply.id) {
                    parent.replies.push(reply);
                }
            }
            None => top.push(reply),
        }
    }

    top
}

/// Collapses arbitrarily deep reply nesting into one flat, ordered list.
fn flatten(replies: Vec<Comment>) -> Vec<Comment> {
    let mut out = Vec::new();
    for mut reply in replies {
        let nested = std::mem::take(&mut reply.replies);
        out.push(reply);
        out.extend(flatten(nested));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::{Author, CommentId};

    fn comment(id: CommentId, parent_id: Option<CommentId>) -> Comment {
        Comment {
            id,
            post_id: 1,
            author: Author {
                id: 3,
                name: Some("lin".to_string()),
            },
            content: format!("comment {id}"),
            parent_id,
            created_at: None,
            reply_count: 0,
            replies: Vec::new(),
        }
    }

    #[test]
    fn flat_replies_group_under_their_parents() {
        let threaded = thread(vec![
            comment(1, None),
            comment(2, None),
            comment(3, Some(1)),
            comment(4, Some(2)),
            comment(5, Some(1)),
        ]);
        assert_eq!(threaded.len(), 2);
        assert_eq!(
            threaded[0].replies.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![3, 5]
        );
        assert_eq!(threaded[1].replies[0].id, 4);
    }

    #[test]
    fn pre_nested_replies_pass_through() {
        let mut parent = comment(1, None);
        parent.replies = vec![comment(2, Some(1)), comment(3, Some(1))];
        let threaded = thread(vec![parent]);
        assert_eq!(threaded.len(), 1);
        assert_eq!(threaded[0].replies.len(), 2);
    }

    #[test]
    fn deep_nesting_collapses_to_two_levels() {
        let mut grandchild_parent = comment(2, Some(1));
        grandchild_parent.replies = vec![comment(3, Some(2))];
        let mut parent = comment(1, None);
        parent.replies = vec![grandchild_parent];
        let threaded = thread(vec![parent]);
        assert_eq!(threaded.len(), 1);
        assert_eq!(
            threaded[0].replies.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert!(threaded[0].replies.iter().all(|r| r.replies.is_empty()));
    }

    #[test]
    fn reply_to_a_reply_lands_on_the_grandparent() {
        let threaded = thread(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
        ]);
        assert_eq!(threaded.len(), 1);
        assert_eq!(
            threaded[0].replies.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn orphaned_replies_are_promoted_not_dropped() {
        let threaded = thread(vec![comment(1, None), comment(9, Some(404))]);
        assert_eq!(threaded.len(), 2);
        assert_eq!(threaded[1].id, 9);
    }
}
