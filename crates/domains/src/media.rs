//! # Media Ingestion
//!
//! The backend ships a post's media as a JSON-encoded string array inside a
//! string field. We decode it exactly once, decide each URL's kind, and hand
//! the rest of the client a typed list; nothing downstream re-inspects URLs.

use serde::{Deserialize, Serialize};

/// What a media URL renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A single media attachment with its kind decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub url: String,
    pub kind: MediaKind,
}

impl MediaItem {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Infers the kind of a media URL.
///
/// Upload paths carry a `/images/` or `/videos/` folder segment, which is
/// authoritative when present. Otherwise the extension decides via the mime
/// registry. URLs that match neither return `None` and are dropped at
/// ingestion.
pub fn infer_kind(url: &str) -> Option<MediaKind> {
    if url.contains("/images/") {
        return Some(MediaKind::Image);
    }
    if url.contains("/videos/") {
        return Some(MediaKind::Video);
    }
    // Query and fragment would confuse the extension lookup.
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let guess = mime_guess::from_path(path).first()?;
    let top_level = guess.type_();
    if top_level == mime::IMAGE {
        Some(MediaKind::Image)
    } else if top_level == mime::VIDEO {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Decodes the wire form (`"[\"https://…/a.jpg\", …]"`) into typed items,
/// keeping only URLs whose kind could be decided.
pub fn parse_media_urls(raw: &str) -> Result<Vec<MediaItem>, serde_json::Error> {
    let urls: Vec<String> = serde_json::from_str(raw)?;
    Ok(urls
        .into_iter()
        .filter_map(|url| infer_kind(&url).map(|kind| MediaItem { url, kind }))
        .collect())
}

/// Re-encodes a media list into the wire form for post updates.
pub fn encode_media_urls(items: &[MediaItem]) -> String {
    let urls: Vec<&str> = items.iter().map(|item| item.url.as_str()).collect();
    serde_json::to_string(&urls).unwrap_or_else(|_| "[]".to_string())
}
