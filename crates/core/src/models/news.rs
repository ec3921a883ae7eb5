//! News items shown on the job-board landing pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Draft, ManagedEntity};
use crate::reconcile::{self, DedupKey, Reconcilable};
use crate::types::{NewsKind, RecordId, RecordStatus};
use crate::validation::{self, ValidationError};

/// A news entry (video, article, banner, announcement, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(rename = "type", default)]
    pub kind: NewsKind,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_true() -> bool {
    true
}

impl NewsItem {
    /// Content key used to collapse duplicates.
    #[must_use]
    pub fn dedup_key(&self) -> Option<DedupKey> {
        reconcile::news_key(self.kind, &self.link, &self.title)
    }
}

impl Reconcilable for NewsItem {
    fn dedup_key(&self) -> Option<DedupKey> {
        Self::dedup_key(self)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn merge_from(&mut self, incoming: &Self) {
        fn take(target: &mut String, value: &str) {
            if !value.trim().is_empty() {
                value.clone_into(target);
            }
        }

        take(&mut self.title, &incoming.title);
        take(&mut self.description, &incoming.description);
        take(&mut self.link, &incoming.link);
        take(&mut self.thumbnail, &incoming.thumbnail);
        self.published = incoming.published;
        self.is_active = incoming.is_active;
        self.created_at = self.created_at.or(incoming.created_at);
        self.updated_at = self.updated_at.or(incoming.updated_at);
    }
}

/// Create/edit form for a news item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsDraft {
    pub title: String,
    pub description: String,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: NewsKind,
    pub thumbnail: String,
    pub published: bool,
}

impl NewsDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, kind: NewsKind, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            link: link.into(),
            ..Self::default()
        }
    }
}

impl Draft for NewsDraft {
    fn name(&self) -> &str {
        &self.title
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_name(&self.title)?;
        if self.kind == NewsKind::Youtube && reconcile::youtube_id(&self.link).is_none() {
            return Err(ValidationError::InvalidField {
                field: "link",
                reason: "not a YouTube video link".to_string(),
            });
        }
        Ok(())
    }
}

/// Partial update of a news item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NewsKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<NewsDraft> for NewsPatch {
    fn from(draft: NewsDraft) -> Self {
        Self {
            title: Some(draft.title.trim().to_owned()),
            description: Some(draft.description),
            link: Some(draft.link.trim().to_owned()),
            kind: Some(draft.kind),
            thumbnail: Some(draft.thumbnail),
            published: Some(draft.published),
            is_active: None,
        }
    }
}

impl ManagedEntity for NewsItem {
    type Draft = NewsDraft;
    type Patch = NewsPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description, &self.link]
    }

    fn from_draft(id: RecordId, draft: NewsDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.trim().to_owned(),
            description: draft.description,
            link: draft.link.trim().to_owned(),
            kind: draft.kind,
            thumbnail: draft.thumbnail,
            published: draft.published,
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    fn apply(&mut self, patch: &NewsPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            title.trim().clone_into(&mut self.title);
        }
        if let Some(description) = &patch.description {
            description.clone_into(&mut self.description);
        }
        if let Some(link) = &patch.link {
            link.trim().clone_into(&mut self.link);
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(thumbnail) = &patch.thumbnail {
            thumbnail.clone_into(&mut self.thumbnail);
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Some(now);
    }

    fn validate_patch(patch: &NewsPatch) -> Result<(), ValidationError> {
        validation::require_name_if_set(patch.title.as_deref())
    }

    fn status(&self) -> Option<RecordStatus> {
        Some(RecordStatus::from_active(self.is_active))
    }

    fn status_patch(status: RecordStatus) -> Option<NewsPatch> {
        Some(NewsPatch {
            is_active: Some(status.is_active()),
            ..NewsPatch::default()
        })
    }

    fn reconcile(items: Vec<Self>) -> Vec<Self> {
        reconcile::reconcile(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(secs, 0).single()
    }

    fn item(id: &str, kind: NewsKind, link: &str, title: &str) -> NewsItem {
        NewsItem {
            id: RecordId::new(id),
            title: title.to_string(),
            description: String::new(),
            link: link.to_string(),
            kind,
            thumbnail: String::new(),
            published: true,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_youtube_links_differing_in_case_collapse() {
        let a = item("1", NewsKind::Youtube, "https://youtu.be/abc", "Intro");
        let b = item("2", NewsKind::Youtube, "https://YOUTU.BE/abc", "Intro video");
        assert_eq!(a.dedup_key().unwrap().to_string(), "yt:abc");
        assert_eq!(a.dedup_key(), b.dedup_key());

        let merged = NewsItem::reconcile(vec![a, b]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_newer_update_wins() {
        let mut old = item("1", NewsKind::Article, "https://blog.io/a", "Old title");
        old.updated_at = at(100);
        let mut new = item("2", NewsKind::Article, "https://blog.io/a/", "New title");
        new.updated_at = at(200);

        let merged = NewsItem::reconcile(vec![old.clone(), new.clone()]);
        assert_eq!(merged, vec![new.clone()]);

        // Order of arrival does not matter.
        let merged = NewsItem::reconcile(vec![new.clone(), old]);
        assert_eq!(merged, vec![new]);
    }

    #[test]
    fn test_tie_merges_into_first_seen() {
        let mut first = item("1", NewsKind::Banner, "https://jobs.io/fair", "Job fair");
        first.thumbnail = "https://cdn.io/a.png".to_string();
        first.updated_at = at(50);
        let mut second = item("2", NewsKind::Banner, "https://jobs.io/fair", "");
        second.description = "Spring hiring fair".to_string();
        second.updated_at = at(50);

        let merged = NewsItem::reconcile(vec![first, second]);
        assert_eq!(merged.len(), 1);
        let kept = &merged[0];
        assert_eq!(kept.id.as_str(), "1");
        assert_eq!(kept.title, "Job fair");
        assert_eq!(kept.description, "Spring hiring fair");
        assert_eq!(kept.thumbnail, "https://cdn.io/a.png");
    }

    #[test]
    fn test_sorted_newest_created_first_missing_is_oldest() {
        let mut a = item("a", NewsKind::Link, "https://a.io", "A");
        a.created_at = at(10);
        let b = item("b", NewsKind::Link, "https://b.io", "B");
        let mut c = item("c", NewsKind::Link, "https://c.io", "C");
        c.created_at = at(30);

        let ids: Vec<_> = NewsItem::reconcile(vec![a, b, c])
            .into_iter()
            .map(|n| n.id.into_inner())
            .collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut items = Vec::new();
        for (i, (link, updated)) in [
            ("https://youtu.be/abc", 5),
            ("https://YOUTU.BE/abc", 5),
            ("https://youtu.be/xyz", 1),
            ("https://youtu.be/abc", 9),
        ]
        .into_iter()
        .enumerate()
        {
            let mut n = item(&i.to_string(), NewsKind::Youtube, link, "clip");
            n.updated_at = at(updated);
            n.created_at = at(i64::try_from(i).unwrap());
            items.push(n);
        }

        let once = NewsItem::reconcile(items);
        let twice = NewsItem::reconcile(once.clone());
        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_wire_format_uses_type_and_camel_case() {
        let json = r#"{
            "id": 9, "title": "Hiring", "link": "https://x.io", "type": "announcement",
            "isActive": false, "createdAt": "2024-05-01T10:00:00Z"
        }"#;
        let news: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(news.kind, NewsKind::Announcement);
        assert!(!news.is_active);
        assert!(!news.published);
        assert_eq!(news.status(), Some(RecordStatus::Inactive));
        assert!(news.created_at.is_some());
    }

    #[test]
    fn test_youtube_draft_requires_video_link() {
        let draft = NewsDraft::new("Clip", NewsKind::Youtube, "https://example.com");
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidField { field: "link", .. })
        ));
        let draft = NewsDraft::new("Clip", NewsKind::Youtube, "https://youtu.be/abc");
        assert!(draft.validate().is_ok());
    }
}
