//! Ordered in-memory list of records with unique ids.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jobboard_core::{ManagedEntity, RecordId, matches_search};
use tracing::warn;

/// The records currently shown by one management tab.
///
/// Ids are unique at all times. Insertion order is kept unless a record is
/// explicitly promoted to the front.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: ManagedEntity> Collection<T> {
    /// Build a collection, keeping the first record for any repeated id.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id().clone());
                if !fresh {
                    warn!(id = %item.id(), "Dropping record with duplicate id");
                }
                fresh
            })
            .collect();
        Self { items }
    }

    /// Swap in a freshly fetched list.
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) {
        *self = Self::from_items(items);
    }

    #[must_use]
    pub fn position(&self, id: &RecordId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.position(id).is_some()
    }

    /// Replace the record with the same id in place, or append it.
    pub fn upsert(&mut self, item: T) {
        let slot = self
            .position(item.id())
            .and_then(|index| self.items.get_mut(index));
        match slot {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<T> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Apply `patch` to the record with this id; returns the updated record.
    pub fn patch(&mut self, id: &RecordId, patch: &T::Patch, now: DateTime<Utc>) -> Option<&T> {
        let index = self.position(id)?;
        let item = self.items.get_mut(index)?;
        item.apply(patch, now);
        Some(item)
    }

    /// Move a record to the front. Returns `false` if the id is unknown.
    pub fn promote(&mut self, id: &RecordId) -> bool {
        let Some(head) = self
            .position(id)
            .and_then(|index| self.items.get_mut(..=index))
        else {
            return false;
        };
        head.rotate_right(1);
        true
    }

    /// Records matching the search term, in collection order.
    #[must_use]
    pub fn filter(&self, term: &str) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| matches_search(*item, term))
            .collect()
    }

    /// Timestamp-based id that is not yet used in this collection.
    #[must_use]
    pub fn next_id(&self, prefix: &str, now: DateTime<Utc>) -> RecordId {
        let base = RecordId::synthetic(prefix, now);
        if !self.contains(&base) {
            return base;
        }
        (1..)
            .map(|n| RecordId::new(format!("{base}-{n}")))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or(base)
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jobboard_core::{Record, RecordPatch};

    use super::*;

    fn sample() -> Collection<Record> {
        Collection::from_items([
            Record::named("1", "Information Technology").with_description("Software and IT"),
            Record::named("2", "Banking & Finance"),
            Record::named("3", "Healthcare"),
        ])
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let collection = Collection::from_items([
            Record::named("1", "First"),
            Record::named("1", "Second"),
            Record::named("2", "Other"),
        ]);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(&RecordId::new("1")).unwrap().name, "First");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let collection = sample();
        let hits = collection.filter("TECH");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Information Technology");
        assert_eq!(collection.filter("  ").len(), 3);
        assert_eq!(collection.filter("software").len(), 1);
    }

    #[test]
    fn test_promote_moves_to_front_keeping_rest() {
        let mut collection = sample();
        assert!(collection.promote(&RecordId::new("3")));
        let ids: Vec<_> = collection.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
        assert!(!collection.promote(&RecordId::new("missing")));
    }

    #[test]
    fn test_promote_edges() {
        let mut collection = sample();
        assert!(collection.promote(&RecordId::new("1")));
        assert_eq!(collection.as_slice()[0].id.as_str(), "1");
        assert_eq!(collection.len(), 3);

        let mut empty = Collection::<Record>::new();
        assert!(!empty.promote(&RecordId::new("1")));
        assert!(empty.patch(&RecordId::new("1"), &RecordPatch::default(), Utc::now()).is_none());
    }

    #[test]
    fn test_accessors_need_no_entity() {
        let collection = Collection::<u32>::new();
        assert!(collection.is_empty());
        assert_eq!(collection.as_slice().len(), 0);
        assert_eq!(collection.iter().count(), 0);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut collection = sample();
        collection.upsert(Record::named("2", "Banking"));
        collection.upsert(Record::named("4", "Retail"));
        let names: Vec<_> = collection.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Information Technology", "Banking", "Healthcare", "Retail"]);
    }

    #[test]
    fn test_patch_and_remove() {
        let mut collection = sample();
        let patch = RecordPatch {
            name: Some("Tech".to_string()),
            ..RecordPatch::default()
        };
        let updated = collection.patch(&RecordId::new("1"), &patch, Utc::now()).unwrap();
        assert_eq!(updated.name, "Tech");

        assert!(collection.remove(&RecordId::new("2")).is_some());
        assert!(collection.remove(&RecordId::new("2")).is_none());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_next_id_avoids_collisions() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let mut collection = Collection::<Record>::new();
        let first = collection.next_id("industry", now);
        assert_eq!(first.as_str(), "industry-1700000000000");

        collection.upsert(Record::named(first.clone(), "A"));
        let second = collection.next_id("industry", now);
        assert_eq!(second.as_str(), "industry-1700000000000-1");
    }
}
