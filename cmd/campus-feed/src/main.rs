//! # campus-feed
//!
//! Command-line harness for the feed client: wires configuration into the
//! REST adapter and the feed controller, then runs one interaction against
//! a live backend. Useful for smoke-testing a local stack.
//!
//! ```text
//! campus-feed feed
//! campus-feed like 42
//! campus-feed detail 42
//! campus-feed comment 42 "great spot"
//! campus-feed reply 42 10 "same"
//! campus-feed delete 42
//! campus-feed report 42 Spam "bot account"
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use api_adapters::HttpFeedBackend;
use configs::ClientConfig;
use domains::models::{Post, ReportReason, ReportTarget, Session};
use services::{FeedController, ToggleOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ClientConfig::load()?;
    let backend = HttpFeedBackend::with_timeout(
        &config.base_url,
        config.auth_token.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    let session = Session::new(config.user_id.unwrap_or_default());
    let feed = FeedController::new(Arc::new(backend), session).with_page_size(config.page_size);
    info!(base_url = %config.base_url, user_id = session.user_id, "campus-feed client ready");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("feed") => {
            for post in feed.load().await? {
                print_post(&feed, &post);
            }
        }
        Some("like") => {
            let post_id = parse_id(args.get(1), "post id")?;
            feed.load().await?;
            match feed.toggle_like(post_id).await? {
                ToggleOutcome::Applied(state) => {
                    println!(
                        "post {post_id}: {} ({} likes)",
                        if state.liked { "liked" } else { "unliked" },
                        state.count
                    );
                }
                ToggleOutcome::InFlight => println!("post {post_id}: toggle already in flight"),
            }
        }
        Some("detail") => {
            let post_id = parse_id(args.get(1), "post id")?;
            let detail = feed.open_detail(post_id).await?;
            print_post(&feed, &detail.post);
            for comment in &detail.comments {
                println!(
                    "  #{} {}: {}",
                    comment.id,
                    comment.author.name.as_deref().unwrap_or("someone"),
                    comment.content
                );
                for reply in &comment.replies {
                    println!(
                        "    #{} {}: {}",
                        reply.id,
                        reply.author.name.as_deref().unwrap_or("someone"),
                        reply.content
                    );
                }
            }
        }
        Some("comment") => {
            let post_id = parse_id(args.get(1), "post id")?;
            let text = args[2..].join(" ");
            let detail = feed.submit_comment(post_id, &text).await?;
            println!(
                "comment posted; post {post_id} now has {} comments",
                detail.post.comment_count
            );
        }
        Some("reply") => {
            let post_id = parse_id(args.get(1), "post id")?;
            let parent_id = parse_id(args.get(2), "comment id")?;
            let text = args[3..].join(" ");
            feed.submit_reply(post_id, parent_id, &text).await?;
            println!("reply posted under comment {parent_id}");
        }
        Some("delete") => {
            let post_id = parse_id(args.get(1), "post id")?;
            feed.delete_post(post_id).await?;
            println!("post {post_id} deleted");
        }
        Some("report") => {
            let post_id = parse_id(args.get(1), "post id")?;
            let reason = args.get(2).map(String::as_str).and_then(parse_reason);
            let description = if args.len() > 3 {
                Some(args[3..].join(" "))
            } else {
                None
            };
            feed.report(ReportTarget::Post(post_id), reason, description.as_deref())
                .await?;
            println!("report submitted, it will be reviewed shortly");
        }
        Some(other) => bail!("unknown command: {other}"),
    }

    Ok(())
}

fn parse_id(arg: Option<&String>, what: &str) -> anyhow::Result<i64> {
    arg.with_context(|| format!("missing {what}"))?
        .parse()
        .with_context(|| format!("{what} must be an integer"))
}

fn parse_reason(label: &str) -> Option<ReportReason> {
    ReportReason::ALL
        .into_iter()
        .find(|reason| reason.as_str().eq_ignore_ascii_case(label))
}

fn print_post(feed: &FeedController, post: &Post) {
    let like = feed.like_state(post.id);
    let liked = like.map(|state| state.liked).unwrap_or(false);
    let count = like.map(|state| state.count).unwrap_or(post.like_count);
    println!(
        "[{}] {}: {} | {} like(s){} | {} comment(s) | {} media",
        post.id,
        post.author.name.as_deref().unwrap_or("someone"),
        post.content,
        count,
        if liked { " ♥" } else { "" },
        post.comment_count,
        post.media.len()
    );
}
