//! News management on top of the generic store.
//!
//! Every list the news store loads is run through the deduplication
//! reconciler, so the panel never shows two items with the same content key.

use std::collections::HashSet;

use jobboard_core::{ManagedEntity, NewsItem, NewsKind, NewsPatch, RecordId};
use tracing::{debug, info};

use crate::error::MutationError;
use crate::remote::RemoteAdapter;
use crate::store::{Change, CrudStore};

impl<A: RemoteAdapter<NewsItem>> CrudStore<NewsItem, A> {
    /// The reconciled list, newest first, ready to be saved.
    #[must_use]
    pub fn persist(&self) -> Vec<NewsItem> {
        self.snapshot()
    }

    /// Merge externally supplied items (e.g. an import file) into the local
    /// list. Returns how many duplicates were folded away.
    ///
    /// An incoming item whose id is already listed counts as a duplicate and
    /// the listed one is kept.
    pub fn import(&mut self, incoming: impl IntoIterator<Item = NewsItem>) -> usize {
        let mut combined = self.items().as_slice().to_vec();
        let mut seen: HashSet<RecordId> = combined.iter().map(|item| item.id.clone()).collect();
        let mut before = combined.len();
        for item in incoming {
            before += 1;
            if seen.insert(item.id.clone()) {
                combined.push(item);
            } else {
                debug!(id = %item.id, "Import repeats a listed id");
            }
        }
        let merged = NewsItem::reconcile(combined);
        let folded = before - merged.len();
        info!(kept = merged.len(), folded, "Imported news items");
        self.replace_items(merged);
        folded
    }

    /// Publish or unpublish an item.
    ///
    /// # Errors
    ///
    /// See [`CrudStore::patch`].
    pub async fn set_published(
        &mut self,
        id: &RecordId,
        published: bool,
    ) -> Result<Change<NewsItem>, MutationError> {
        let patch = NewsPatch {
            published: Some(published),
            ..NewsPatch::default()
        };
        self.patch(id, patch).await
    }

    /// Items of one content kind, in display order.
    #[must_use]
    pub fn of_kind(&self, kind: NewsKind) -> Vec<&NewsItem> {
        self.items().iter().filter(|item| item.kind == kind).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use jobboard_core::{EntityKind, NewsDraft};

    use super::*;
    use crate::notify::NoticeQueue;

    fn video(id: &str, link: &str, created: i64) -> NewsItem {
        let mut item = NewsItem::from_draft(
            RecordId::new(id),
            NewsDraft::new("Career tips", NewsKind::Youtube, link),
            Utc::now(),
        );
        item.created_at = Utc.timestamp_opt(created, 0).single();
        item.updated_at = item.created_at;
        item
    }

    #[tokio::test]
    async fn test_toggle_flips_is_active() {
        let queue = Arc::new(NoticeQueue::new());
        let mut news = CrudStore::<NewsItem>::local(EntityKind::News, queue.clone())
            .with_items([video("n1", "https://youtu.be/abc", 10)]);
        let id = RecordId::new("n1");

        news.toggle_status(&id).await.unwrap();
        assert!(!news.get(&id).unwrap().is_active);
        news.toggle_status(&id).await.unwrap();
        assert!(news.get(&id).unwrap().is_active);
    }

    #[test]
    fn test_import_folds_duplicates_and_persist_sorts() {
        let queue = Arc::new(NoticeQueue::new());
        let mut news = CrudStore::<NewsItem>::local(EntityKind::News, queue.clone())
            .with_items([video("n1", "https://youtu.be/abc", 10)]);

        let folded = news.import([
            video("n2", "https://www.youtube.com/watch?v=abc", 10),
            video("n3", "https://youtu.be/xyz", 20),
        ]);
        assert_eq!(folded, 1);

        let saved = news.persist();
        let ids: Vec<_> = saved.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["n3", "n1"]);
        assert_eq!(news.of_kind(NewsKind::Youtube).len(), 2);
    }

    #[test]
    fn test_import_counts_repeated_ids() {
        let queue = Arc::new(NoticeQueue::new());
        let mut news = CrudStore::<NewsItem>::local(EntityKind::News, queue.clone())
            .with_items([video("n1", "https://youtu.be/abc", 10)]);

        let folded = news.import([
            video("n1", "https://youtu.be/other", 30),
            video("n2", "https://youtu.be/xyz", 20),
            video("n2", "https://youtu.be/later", 40),
        ]);
        assert_eq!(folded, 2);
        assert_eq!(news.items().len(), 2);
        assert_eq!(
            news.get(&RecordId::new("n1")).unwrap().link,
            "https://youtu.be/abc"
        );
        assert_eq!(
            news.get(&RecordId::new("n2")).unwrap().link,
            "https://youtu.be/xyz"
        );
    }

    #[tokio::test]
    async fn test_publish() {
        let queue = Arc::new(NoticeQueue::new());
        let mut news = CrudStore::<NewsItem>::local(EntityKind::News, queue.clone())
            .with_items([video("n1", "https://youtu.be/abc", 10)]);
        let id = RecordId::new("n1");

        news.set_published(&id, true).await.unwrap();
        assert!(news.get(&id).unwrap().published);
        assert_eq!(queue.drain().len(), 1);
    }
}
