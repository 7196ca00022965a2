//! Feed flows end to end: real reqwest adapter, real HTTP, stub backend.

use std::sync::Arc;

use secrecy::SecretString;

use api_adapters::HttpFeedBackend;
use domains::media::MediaKind;
use domains::models::Session;
use domains::Error;
use integration_tests::stub_backend::{post_dto, spawn, StubState};
use services::{FeedController, LikeState, ToggleOutcome};

fn controller_for(base_url: &str) -> FeedController {
    let backend = HttpFeedBackend::new(base_url, None).expect("build adapter");
    FeedController::new(Arc::new(backend), Session::new(1))
}

#[tokio::test]
async fn load_types_media_and_seeds_like_state() {
    let mut post = post_dto(1, 7, 5);
    post.media_urls = Some(
        r#"["https://cdn.x/images/a.jpg","https://cdn.x/b.mp4","https://cdn.x/notes.txt"]"#
            .to_string(),
    );
    let mut stub = StubState::with_posts(vec![post, post_dto(2, 7, 0)]);
    stub.liked.insert(2);
    let (base_url, _shared) = spawn(stub).await;
    let feed = controller_for(&base_url);

    let posts = feed.load().await.unwrap();
    assert_eq!(posts.len(), 2);
    let kinds: Vec<MediaKind> = posts[0].media.iter().map(|item| item.kind).collect();
    assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Video]);
    assert_eq!(
        feed.like_state(2),
        Some(LikeState {
            liked: true,
            count: 0
        })
    );
}

#[tokio::test]
async fn toggle_like_round_trips_and_survives_a_reload() {
    let (base_url, shared) = spawn(StubState::with_posts(vec![post_dto(1, 7, 5)])).await;
    let feed = controller_for(&base_url);

    feed.load().await.unwrap();
    let outcome = feed.toggle_like(1).await.unwrap();
    assert_eq!(
        outcome,
        ToggleOutcome::Applied(LikeState {
            liked: true,
            count: 6
        })
    );
    assert!(shared.lock().unwrap().liked.contains(&1));

    // An unchanged backend reload converges on the same state.
    feed.load().await.unwrap();
    assert_eq!(
        feed.like_state(1),
        Some(LikeState {
            liked: true,
            count: 6
        })
    );
}

#[tokio::test]
async fn failed_toggle_rolls_back_and_leaves_the_server_untouched() {
    let (base_url, shared) = spawn(StubState::with_posts(vec![post_dto(1, 7, 5)])).await;
    let feed = controller_for(&base_url);

    feed.load().await.unwrap();
    shared.lock().unwrap().fail_likes = true;
    let err = feed.toggle_like(1).await.unwrap_err();
    assert!(matches!(err, Error::Api { code: 500, .. }));
    assert_eq!(
        feed.like_state(1),
        Some(LikeState {
            liked: false,
            count: 5
        })
    );
    assert!(shared.lock().unwrap().liked.is_empty());
}

#[tokio::test]
async fn failed_second_toggle_keeps_the_first_toggles_state() {
    let (base_url, shared) = spawn(StubState::with_posts(vec![post_dto(1, 7, 5)])).await;
    let feed = controller_for(&base_url);

    feed.load().await.unwrap();
    feed.toggle_like(1).await.unwrap();
    shared.lock().unwrap().fail_likes = true;
    feed.toggle_like(1).await.unwrap_err();
    // Rollback target is the state after the first toggle.
    assert_eq!(
        feed.like_state(1),
        Some(LikeState {
            liked: true,
            count: 6
        })
    );
}

#[tokio::test]
async fn deleted_post_is_gone_immediately_and_after_reload() {
    let (base_url, _shared) =
        spawn(StubState::with_posts(vec![post_dto(1, 7, 0), post_dto(42, 1, 2)])).await;
    let feed = controller_for(&base_url);

    feed.load().await.unwrap();
    tokio_test::assert_ok!(feed.delete_post(42).await);
    assert!(feed.posts().iter().all(|post| post.id != 42));

    let reloaded = feed.load().await.unwrap();
    assert!(reloaded.iter().all(|post| post.id != 42));
}

#[tokio::test]
async fn pagination_walks_the_feed_in_pages() {
    let posts = (1..=25).map(|id| post_dto(id, 7, 0)).collect();
    let (base_url, _shared) = spawn(StubState::with_posts(posts)).await;
    let backend = HttpFeedBackend::new(&base_url, None).expect("build adapter");
    let feed =
        FeedController::new(Arc::new(backend), Session::new(1)).with_page_size(10);

    assert_eq!(feed.load().await.unwrap().len(), 10);
    assert_eq!(feed.load_more().await.unwrap().len(), 10);
    assert_eq!(feed.load_more().await.unwrap().len(), 5);
    assert_eq!(feed.posts().len(), 25);
}

#[tokio::test]
async fn bearer_token_rides_along_on_every_request() {
    let (base_url, shared) = spawn(StubState::with_posts(vec![post_dto(1, 7, 0)])).await;
    let backend = HttpFeedBackend::new(&base_url, Some(SecretString::from("sekrit")))
        .expect("build adapter");
    let feed = FeedController::new(Arc::new(backend), Session::new(1));

    feed.load().await.unwrap();
    assert_eq!(
        shared.lock().unwrap().last_authorization.as_deref(),
        Some("Bearer sekrit")
    );
}
