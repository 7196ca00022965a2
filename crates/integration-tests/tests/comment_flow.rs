//! Comment flows: submit, reply, delete. Reconciliation is always a full
//! reload rather than an optimistic insert.

use std::sync::Arc;

use api_adapters::HttpFeedBackend;
use domains::models::Session;
use domains::Error;
use integration_tests::stub_backend::{comment_dto, post_dto, spawn, StubState};
use services::FeedController;

fn controller_for(base_url: &str) -> FeedController {
    let backend = HttpFeedBackend::new(base_url, None).expect("build adapter");
    FeedController::new(Arc::new(backend), Session::new(1))
}

#[tokio::test]
async fn submitted_comment_shows_up_via_full_reload() {
    let (base_url, _shared) = spawn(StubState::with_posts(vec![post_dto(1, 7, 0)])).await;
    let feed = controller_for(&base_url);

    let detail = feed.submit_comment(1, "nice spot").await.unwrap();
    assert_eq!(detail.post.comment_count, 1);
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].content, "nice spot");
}

#[tokio::test]
async fn blank_comment_never_reaches_the_network() {
    let (base_url, shared) = spawn(StubState::with_posts(vec![post_dto(1, 7, 0)])).await;
    let feed = controller_for(&base_url);

    let err = feed.submit_comment(1, "   ").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(shared.lock().unwrap().requests, 0);
}

#[tokio::test]
async fn replies_thread_under_their_parent() {
    let mut stub = StubState::with_posts(vec![post_dto(1, 7, 0)]);
    stub.comments.push(comment_dto(10, 1, None));
    let (base_url, _shared) = spawn(stub).await;
    let feed = controller_for(&base_url);

    let detail = feed.submit_reply(1, 10, "same here").await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].id, 10);
    assert_eq!(detail.comments[0].replies.len(), 1);
    assert_eq!(detail.comments[0].replies[0].content, "same here");
}

#[tokio::test]
async fn replying_to_a_missing_comment_surfaces_the_envelope_error() {
    let (base_url, _shared) = spawn(StubState::with_posts(vec![post_dto(1, 7, 0)])).await;
    let feed = controller_for(&base_url);

    let err = feed.submit_reply(1, 404, "hello?").await.unwrap_err();
    assert!(matches!(err, Error::Api { code: 404, .. }));
}

#[tokio::test]
async fn deleting_a_top_level_comment_takes_its_replies_with_it() {
    let mut stub = StubState::with_posts(vec![{
        let mut post = post_dto(1, 7, 0);
        post.comments_count = 3;
        post
    }]);
    stub.comments.push(comment_dto(10, 1, None));
    stub.comments.push(comment_dto(11, 1, Some(10)));
    stub.comments.push(comment_dto(20, 1, None));
    let (base_url, shared) = spawn(stub).await;
    let feed = controller_for(&base_url);

    feed.open_detail(1).await.unwrap();
    feed.delete_comment(10).await.unwrap();

    // Local view pruned without a refetch.
    let detail = feed.detail().unwrap();
    assert_eq!(
        detail.comments.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![20]
    );
    // Server side pruned the subtree too.
    let comments = &shared.lock().unwrap().comments;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, 20);
}
