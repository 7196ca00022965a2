//! In-memory stand-in for the campus backend.
//!
//! Serves the envelope contract over real HTTP on a random local port so
//! tests exercise the actual reqwest plumbing. State is inspectable and
//! failure modes are switchable per test.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use api_adapters::dto::{
    AddCommentRequest, CommentDto, PostDto, ReportRequest, UpdatePostRequest,
};
use api_adapters::Envelope;

/// Everything the stub knows, behind one lock.
#[derive(Debug, Default)]
pub struct StubState {
    pub posts: Vec<PostDto>,
    /// Flat comment store; nesting is rebuilt per fetch like the real
    /// backend does.
    pub comments: Vec<CommentDto>,
    /// Post ids the (single) test user has liked.
    pub liked: HashSet<i64>,
    pub reports: Vec<ReportRequest>,
    /// When set, like/unlike answer with a 500 envelope.
    pub fail_likes: bool,
    /// Total requests handled; lets tests assert that validation
    /// failures never reached the network.
    pub requests: usize,
    /// Last Authorization header seen on a feed fetch.
    pub last_authorization: Option<String>,
    next_comment_id: i64,
}

impl StubState {
    pub fn with_posts(posts: Vec<PostDto>) -> Self {
        Self {
            posts,
            next_comment_id: 100,
            ..Self::default()
        }
    }
}

pub type Shared = Arc<Mutex<StubState>>;

/// A plain post the tests can hang state off.
pub fn post_dto(id: i64, author_id: i64, likes: i32) -> PostDto {
    PostDto {
        id,
        user_id: author_id,
        username: Some(format!("user{author_id}")),
        content: format!("post {id}"),
        media_urls: None,
        kind: "normal".to_string(),
        visibility: "public".to_string(),
        circle_id: None,
        likes_count: likes,
        comments_count: 0,
        shares_count: 0,
        create_time: None,
        update_time: None,
        deleted: 0,
    }
}

pub fn comment_dto(id: i64, post_id: i64, parent: Option<i64>) -> CommentDto {
    CommentDto {
        id,
        post_id,
        user_id: 2,
        username: Some("lin".to_string()),
        content: format!("comment {id}"),
        parent_comment_id: parent,
        create_time: None,
        replies: None,
        reply_count: 0,
    }
}

/// Binds a random local port, serves the contract, and returns the base
/// URL plus a handle onto the shared state.
pub async fn spawn(state: StubState) -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(state));
    let app = Router::new()
        .route("/api/posts", get(list_posts))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/{id}/like", post(like_post).delete(unlike_post))
        .route("/api/posts/{id}/like/status", get(like_status))
        .route(
            "/api/posts/{id}/comments",
            get(list_comments).post(add_comment),
        )
        .route("/api/comments/{id}/reply", post(reply_to_comment))
        .route("/api/comments/{id}", delete(delete_comment))
        .route("/api/reports", post(submit_report))
        .with_state(shared.clone());
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend serve");
    });
    (format!("http://{addr}"), shared)
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_size")]
    size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    20
}

async fn list_posts(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Json<Envelope<Vec<PostDto>>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    state.last_authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let page = query.page.max(1);
    let start = ((page - 1) * query.size) as usize;
    let items: Vec<PostDto> = state
        .posts
        .iter()
        .skip(start)
        .take(query.size as usize)
        .cloned()
        .collect();
    Json(Envelope::success(items))
}

async fn get_post(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
) -> Json<Envelope<PostDto>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    match state.posts.iter().find(|post| post.id == id) {
        Some(post) => Json(Envelope::success(post.clone())),
        None => Json(Envelope::failure(404, "post not found")),
    }
}

async fn like_post(State(shared): State<Shared>, Path(id): Path<i64>) -> Json<Envelope<Value>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    if state.fail_likes {
        return Json(Envelope::failure(500, "like service unavailable"));
    }
    if state.liked.insert(id) {
        if let Some(post) = state.posts.iter_mut().find(|post| post.id == id) {
            post.likes_count += 1;
        }
    }
    Json(Envelope::success(Value::Null))
}

async fn unlike_post(State(shared): State<Shared>, Path(id): Path<i64>) -> Json<Envelope<Value>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    if state.fail_likes {
        return Json(Envelope::failure(500, "like service unavailable"));
    }
    if state.liked.remove(&id) {
        if let Some(post) = state.posts.iter_mut().find(|post| post.id == id) {
            post.likes_count -= 1;
        }
    }
    Json(Envelope::success(Value::Null))
}

async fn like_status(State(shared): State<Shared>, Path(id): Path<i64>) -> Json<Envelope<bool>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    Json(Envelope::success(state.liked.contains(&id)))
}

async fn list_comments(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
) -> Json<Envelope<Vec<CommentDto>>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    let all = state.comments.clone();
    let top: Vec<CommentDto> = all
        .iter()
        .filter(|comment| comment.post_id == id && comment.parent_comment_id.is_none())
        .cloned()
        .map(|mut comment| {
            let replies: Vec<CommentDto> = all
                .iter()
                .filter(|reply| reply.parent_comment_id == Some(comment.id))
                .cloned()
                .collect();
            comment.reply_count = replies.len() as i32;
            comment.replies = if replies.is_empty() {
                None
            } else {
                Some(replies)
            };
            comment
        })
        .collect();
    Json(Envelope::success(top))
}

async fn add_comment(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
    Json(request): Json<AddCommentRequest>,
) -> Json<Envelope<CommentDto>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    if !state.posts.iter().any(|post| post.id == id) {
        return Json(Envelope::failure(404, "post not found"));
    }
    state.next_comment_id += 1;
    let mut comment = comment_dto(state.next_comment_id, id, None);
    comment.content = request.content;
    state.comments.push(comment.clone());
    if let Some(post) = state.posts.iter_mut().find(|post| post.id == id) {
        post.comments_count += 1;
    }
    Json(Envelope::success(comment))
}

async fn reply_to_comment(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
    Json(request): Json<AddCommentRequest>,
) -> Json<Envelope<CommentDto>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    let Some(parent) = state.comments.iter().find(|comment| comment.id == id).cloned() else {
        return Json(Envelope::failure(404, "comment not found"));
    };
    state.next_comment_id += 1;
    let mut reply = comment_dto(state.next_comment_id, parent.post_id, Some(parent.id));
    reply.content = request.content;
    state.comments.push(reply.clone());
    if let Some(post) = state
        .posts
        .iter_mut()
        .find(|post| post.id == parent.post_id)
    {
        post.comments_count += 1;
    }
    Json(Envelope::success(reply))
}

async fn update_post(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> Json<Envelope<PostDto>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    match state.posts.iter_mut().find(|post| post.id == id) {
        Some(post) => {
            post.content = request.content;
            post.media_urls = request.media_urls;
            post.kind = request.kind;
            post.visibility = request.visibility;
            post.circle_id = request.circle_id;
            Json(Envelope::success(post.clone()))
        }
        None => Json(Envelope::failure(404, "post not found")),
    }
}

async fn delete_post(State(shared): State<Shared>, Path(id): Path<i64>) -> Json<Envelope<Value>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    let before = state.posts.len();
    state.posts.retain(|post| post.id != id);
    if state.posts.len() == before {
        return Json(Envelope::failure(404, "post not found"));
    }
    state.comments.retain(|comment| comment.post_id != id);
    Json(Envelope::success(Value::Null))
}

async fn delete_comment(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
) -> Json<Envelope<Value>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    let Some(target) = state.comments.iter().find(|comment| comment.id == id).cloned() else {
        return Json(Envelope::failure(404, "comment not found"));
    };
    let removed_ids: HashSet<i64> = state
        .comments
        .iter()
        .filter(|comment| comment.id == id || comment.parent_comment_id == Some(id))
        .map(|comment| comment.id)
        .collect();
    state
        .comments
        .retain(|comment| !removed_ids.contains(&comment.id));
    if let Some(post) = state
        .posts
        .iter_mut()
        .find(|post| post.id == target.post_id)
    {
        post.comments_count -= removed_ids.len() as i32;
    }
    Json(Envelope::success(Value::Null))
}

async fn submit_report(
    State(shared): State<Shared>,
    Json(request): Json<ReportRequest>,
) -> Json<Envelope<Value>> {
    let mut state = shared.lock().unwrap();
    state.requests += 1;
    state.reports.push(request);
    Json(Envelope::success(Value::Null))
}
