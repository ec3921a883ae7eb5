//! Content-key deduplication for fetched lists.
//!
//! Records are keyed by what they point at rather than by their `id`, so the
//! same video or article published twice collapses into one entry.
//!
//! Merge rules, applied in input order:
//! - an incoming record with a strictly later `updated_at` replaces the kept one;
//! - on an exact tie the kept record absorbs the incoming record's non-empty
//!   fields and keeps its own id;
//! - an older incoming record is dropped.
//!
//! The result is sorted by `created_at`, newest first. Missing timestamps are
//! treated as the Unix epoch. Running the reconciler on its own output returns
//! the same list.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use url::Url;

use crate::types::NewsKind;

/// Derived uniqueness key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// YouTube video id (case preserved, ids are case-sensitive).
    Youtube(String),
    /// Normalized link.
    Link(String),
    /// Normalized title.
    Title(String),
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Youtube(id) => write!(f, "yt:{id}"),
            Self::Link(link) => write!(f, "link:{link}"),
            Self::Title(title) => write!(f, "title:{title}"),
        }
    }
}

/// A record the reconciler can merge.
pub trait Reconcilable {
    /// Content key; `None` means the record is never merged with another.
    fn dedup_key(&self) -> Option<DedupKey>;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
    /// Shallow merge of `incoming`'s non-empty fields into `self`.
    fn merge_from(&mut self, incoming: &Self);
}

/// Collapse `items` to one record per derived key.
#[must_use]
pub fn reconcile<T: Reconcilable>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::new();
    let mut by_key: HashMap<DedupKey, usize> = HashMap::new();

    for item in items {
        let Some(key) = item.dedup_key() else {
            kept.push(item);
            continue;
        };

        let existing = by_key.get(&key).and_then(|&pos| kept.get_mut(pos));
        match existing {
            Some(existing) => {
                match stamp(item.updated_at()).cmp(&stamp(existing.updated_at())) {
                    std::cmp::Ordering::Greater => *existing = item,
                    std::cmp::Ordering::Equal => existing.merge_from(&item),
                    std::cmp::Ordering::Less => {}
                }
            }
            None => {
                by_key.insert(key, kept.len());
                kept.push(item);
            }
        }
    }

    kept.sort_by(|a, b| stamp(b.created_at()).cmp(&stamp(a.created_at())));
    kept
}

/// Key of a news item: YouTube id, then link, then title.
#[must_use]
pub fn news_key(kind: NewsKind, link: &str, title: &str) -> Option<DedupKey> {
    if kind == NewsKind::Youtube {
        if let Some(id) = youtube_id(link) {
            return Some(DedupKey::Youtube(id));
        }
    }

    let link = normalize_link(link);
    if !link.is_empty() {
        return Some(DedupKey::Link(link));
    }

    let title = normalize_title(title);
    (!title.is_empty()).then_some(DedupKey::Title(title))
}

/// Lower-case and strip trailing slashes.
#[must_use]
pub fn normalize_link(link: &str) -> String {
    link.trim().to_lowercase().trim_end_matches('/').to_owned()
}

/// Lower-case and collapse whitespace.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Extract the video id from the usual YouTube link shapes.
///
/// Handles `youtu.be/<id>`, `youtube.com/watch?v=<id>` and the
/// `/embed/`, `/shorts/`, `/live/` and `/v/` paths. Scheme-less links are
/// accepted.
#[must_use]
pub fn youtube_id(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    let url = Url::parse(link)
        .or_else(|_| Url::parse(&format!("https://{link}")))
        .ok()?;
    let host = url.host_str()?;
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let id = match host {
        "youtu.be" => segments.next()?.to_owned(),
        "youtube.com" | "youtube-nocookie.com" => match segments.next()? {
            "watch" => url
                .query_pairs()
                .find(|(name, _)| name == "v")
                .map(|(_, value)| value.into_owned())?,
            "embed" | "shorts" | "live" | "v" => segments.next()?.to_owned(),
            _ => return None,
        },
        _ => return None,
    };

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

fn stamp(at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    at.unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_link_shapes() {
        assert_eq!(youtube_id("https://youtu.be/abc").as_deref(), Some("abc"));
        assert_eq!(youtube_id("https://YOUTU.BE/abc").as_deref(), Some("abc"));
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_id("youtube.com/shorts/Xy_-9").as_deref(), Some("Xy_-9"));
        assert_eq!(
            youtube_id("https://m.youtube.com/embed/abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(youtube_id("https://youtube.com/"), None);
        assert_eq!(youtube_id("https://vimeo.com/123"), None);
        assert_eq!(youtube_id(""), None);
    }

    #[test]
    fn test_key_priority() {
        let key = news_key(NewsKind::Youtube, "https://YOUTU.BE/abc", "Launch");
        assert_eq!(key.unwrap().to_string(), "yt:abc");

        // Not a youtube item, so the link is the key even for a youtube URL.
        let key = news_key(NewsKind::Link, "https://Example.com/Post/", "Launch");
        assert_eq!(key.unwrap().to_string(), "link:https://example.com/post");

        let key = news_key(NewsKind::Announcement, "  ", "  Hiring   Fair ");
        assert_eq!(key.unwrap().to_string(), "title:hiring fair");

        assert_eq!(news_key(NewsKind::Article, "", " "), None);
    }

    #[test]
    fn test_youtube_item_without_parsable_id_falls_back_to_link() {
        let key = news_key(NewsKind::Youtube, "https://youtube.com/", "x");
        assert_eq!(key, Some(DedupKey::Link("https://youtube.com".to_string())));
    }
}
