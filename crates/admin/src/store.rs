//! CRUD store: one owned collection plus the mutation executor around it.
//!
//! A store applies create, update, delete, toggle and feature operations to
//! its [`Collection`] according to the [`SyncMode`] in its [`EntityConfig`]:
//!
//! - `LocalOnly`: the change is applied in memory at once and always
//!   succeeds. New records get a timestamp-based id.
//! - `Remote(..)`: the backend is called first. Local state changes only
//!   after the call succeeds, by re-fetching the list or by patching the
//!   confirmed record in, depending on [`AfterMutation`].
//!
//! Validation runs before anything else. Every failure and every success is
//! reported to the [`Notifier`]; a declined confirmation is silent.

use std::sync::Arc;

use chrono::Utc;
use jobboard_core::{
    AfterMutation, Draft, EntityConfig, EntityKind, ManagedEntity, RecordId, SyncMode,
    ValidationError,
};
use tracing::{debug, info, instrument, warn};

use crate::collection::Collection;
use crate::confirm::Confirm;
use crate::error::MutationError;
use crate::notify::{Notice, Notifier};
use crate::remote::{Offline, RemoteAdapter};

/// What a successful store operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    Created(T),
    Updated(T),
    Removed(RecordId),
    /// The record was moved to the front.
    Promoted(RecordId),
    /// The operator declined the confirmation; nothing changed.
    Declined,
}

impl<T> Change<T> {
    /// The record carried by `Created`/`Updated`.
    #[must_use]
    pub const fn record(&self) -> Option<&T> {
        match self {
            Self::Created(item) | Self::Updated(item) => Some(item),
            _ => None,
        }
    }
}

/// Owned store for one entity kind.
pub struct CrudStore<T, A = Offline> {
    config: EntityConfig,
    items: Collection<T>,
    remote: A,
    notifier: Arc<dyn Notifier>,
    confirm: Option<Arc<dyn Confirm>>,
}

impl<T, A> std::fmt::Debug for CrudStore<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudStore")
            .field("kind", &self.config.kind)
            .field("mode", &self.config.mode)
            .field("items", &self.items.len())
            .field("confirm", &self.confirm.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: ManagedEntity> CrudStore<T, Offline> {
    /// In-memory store for a kind that never reaches the backend.
    #[must_use]
    pub fn local(kind: EntityKind, notifier: Arc<dyn Notifier>) -> Self {
        let config = EntityConfig::default_for(kind).with_mode(SyncMode::LocalOnly);
        Self::new(config, Offline, notifier)
    }
}

impl<T: ManagedEntity, A: RemoteAdapter<T>> CrudStore<T, A> {
    #[must_use]
    pub fn new(config: EntityConfig, remote: A, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            items: Collection::new(),
            remote,
            notifier,
            confirm: None,
        }
    }

    /// Attach the prompt consulted before deletes. Without one, deletes are
    /// declined.
    #[must_use]
    pub fn with_confirm(mut self, confirm: Arc<dyn Confirm>) -> Self {
        self.confirm = Some(confirm);
        self
    }

    /// Replace the local contents without touching the backend.
    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.items.replace_all(items);
        self
    }

    /// Replace the local contents in place.
    pub fn replace_items(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.replace_all(items);
    }

    #[must_use]
    pub const fn config(&self) -> &EntityConfig {
        &self.config
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.config.kind
    }

    #[must_use]
    pub const fn items(&self) -> &Collection<T> {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.items.get(id)
    }

    /// Records matching the search term, in display order.
    #[must_use]
    pub fn filtered(&self, term: &str) -> Vec<&T> {
        self.items.filter(term)
    }

    /// Canonical copy of the current list, ready to be saved.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        T::reconcile(self.items.as_slice().to_vec())
    }

    /// Re-fetch the list from the backend.
    ///
    /// Local-only stores keep their contents. Returns the number of records.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::Remote`] if the list call fails; the current
    /// contents are kept.
    #[instrument(skip_all, fields(kind = %self.config.kind))]
    pub async fn refresh(&mut self) -> Result<usize, MutationError> {
        if !self.config.mode.is_remote() {
            return Ok(self.items.len());
        }
        match self.remote.list(self.config.kind).await {
            Ok(items) => {
                self.items.replace_all(T::reconcile(items));
                info!(count = self.items.len(), "Loaded records");
                Ok(self.items.len())
            }
            Err(err) => {
                let message = format!(
                    "Failed to load {}: {}",
                    self.config.kind.title().to_lowercase(),
                    err.user_message()
                );
                warn!(error = %err, "Failed to load records");
                self.notifier.notify(Notice::error(message));
                Err(err.into())
            }
        }
    }

    /// Create a record from a draft.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::Validation`] if the draft is invalid or
    /// conflicts with an existing record, or [`MutationError::Remote`] if the
    /// backend rejects it. The collection is unchanged in both cases.
    #[instrument(skip_all, fields(kind = %self.config.kind))]
    pub async fn create(&mut self, draft: T::Draft) -> Result<Change<T>, MutationError> {
        let checked = draft
            .validate()
            .and_then(|()| T::check_conflicts(&draft, self.items.as_slice(), None));
        if let Err(err) = checked {
            return Err(self.fail(err.into()));
        }

        let created = match self.config.mode {
            SyncMode::LocalOnly => {
                let now = Utc::now();
                let id = self.items.next_id(self.config.kind.as_str(), now);
                let item = T::from_draft(id, draft, now);
                self.items.upsert(item.clone());
                item
            }
            SyncMode::Remote(after) => {
                let confirmed = match self.remote.create(self.config.kind, &draft).await {
                    Ok(item) => item,
                    Err(err) => return Err(self.fail(err.into())),
                };
                self.settle(after, confirmed).await
            }
        };

        debug!(id = %created.id(), "Record created");
        self.succeed("created");
        Ok(Change::Created(created))
    }

    /// Replace the editable fields of a record with a full draft.
    ///
    /// # Errors
    ///
    /// Same as [`CrudStore::create`], plus [`MutationError::NotFound`] for an
    /// unknown id.
    #[instrument(skip_all, fields(kind = %self.config.kind, id = %id))]
    pub async fn update(
        &mut self,
        id: &RecordId,
        draft: T::Draft,
    ) -> Result<Change<T>, MutationError> {
        let checked = draft
            .validate()
            .and_then(|()| T::check_conflicts(&draft, self.items.as_slice(), Some(id)));
        if let Err(err) = checked {
            return Err(self.fail(err.into()));
        }
        self.apply_patch(id, T::Patch::from(draft), "updated").await
    }

    /// Apply a partial update; only the set fields are sent.
    ///
    /// # Errors
    ///
    /// Same as [`CrudStore::update`].
    #[instrument(skip_all, fields(kind = %self.config.kind, id = %id))]
    pub async fn patch(&mut self, id: &RecordId, patch: T::Patch) -> Result<Change<T>, MutationError> {
        if let Err(err) = T::validate_patch(&patch) {
            return Err(self.fail(err.into()));
        }
        self.apply_patch(id, patch, "updated").await
    }

    /// Flip a record between active and inactive.
    ///
    /// The next status is computed from the local copy; remote-backed kinds
    /// send only the status field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoStatus`] (as [`MutationError::Validation`])
    /// for kinds without a status, otherwise as [`CrudStore::patch`].
    #[instrument(skip_all, fields(kind = %self.config.kind, id = %id))]
    pub async fn toggle_status(&mut self, id: &RecordId) -> Result<Change<T>, MutationError> {
        let current = match self.items.get(id) {
            Some(item) => item.status(),
            None => return Err(self.missing(id)),
        };
        let Some((next, patch)) = current.and_then(|status| {
            let next = status.toggled();
            T::status_patch(next).map(|patch| (next, patch))
        }) else {
            return Err(self.fail(ValidationError::NoStatus.into()));
        };

        let verb = if next.is_active() { "activated" } else { "deactivated" };
        self.apply_patch(id, patch, verb).await
    }

    /// Delete a record after the operator confirms.
    ///
    /// Returns [`Change::Declined`] without notifying when there is no
    /// prompt or the operator says no.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] for an unknown id, or
    /// [`MutationError::Remote`] if the backend refuses; the record stays.
    #[instrument(skip_all, fields(kind = %self.config.kind, id = %id))]
    pub async fn delete(&mut self, id: &RecordId) -> Result<Change<T>, MutationError> {
        let Some(label) = self.items.get(id).map(|item| item.label().to_owned()) else {
            return Err(self.missing(id));
        };

        let prompt = format!("Delete {} \"{label}\"?", self.config.kind.noun());
        let confirmed = self.confirm.as_ref().is_some_and(|c| c.confirm(&prompt));
        if !confirmed {
            debug!("Delete declined");
            return Ok(Change::Declined);
        }

        match self.config.mode {
            SyncMode::LocalOnly => {
                self.items.remove(id);
            }
            SyncMode::Remote(after) => {
                if let Err(err) = self.remote.remove(self.config.kind, id).await {
                    return Err(self.fail(err.into()));
                }
                let refetched = after == AfterMutation::Refetch && self.refetch().await;
                if !refetched {
                    self.items.remove(id);
                }
            }
        }

        self.succeed("deleted");
        Ok(Change::Removed(id.clone()))
    }

    /// Move a record to the front of the list.
    ///
    /// Display order only; nothing is sent to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] for an unknown id.
    pub fn feature(&mut self, id: &RecordId) -> Result<Change<T>, MutationError> {
        if !self.items.promote(id) {
            return Err(self.missing(id));
        }
        self.succeed("featured");
        Ok(Change::Promoted(id.clone()))
    }

    async fn apply_patch(
        &mut self,
        id: &RecordId,
        patch: T::Patch,
        verb: &str,
    ) -> Result<Change<T>, MutationError> {
        if !self.items.contains(id) {
            return Err(self.missing(id));
        }

        let updated = match self.config.mode {
            SyncMode::LocalOnly => match self.items.patch(id, &patch, Utc::now()) {
                Some(item) => item.clone(),
                None => return Err(self.missing(id)),
            },
            SyncMode::Remote(after) => {
                let confirmed = match self.remote.update(self.config.kind, id, &patch).await {
                    Ok(item) => item,
                    Err(err) => return Err(self.fail(err.into())),
                };
                self.settle(after, confirmed).await
            }
        };

        self.succeed(verb);
        Ok(Change::Updated(updated))
    }

    /// Bring local state in line with a record the backend just confirmed.
    async fn settle(&mut self, after: AfterMutation, confirmed: T) -> T {
        let refetched = after == AfterMutation::Refetch && self.refetch().await;
        if refetched {
            // The refetched list is authoritative; fall back to the response
            // if reconciliation folded the record into another one.
            return self.items.get(confirmed.id()).cloned().unwrap_or(confirmed);
        }
        self.items.upsert(confirmed.clone());
        confirmed
    }

    /// Replace the list from the backend; `false` if the call failed.
    async fn refetch(&mut self) -> bool {
        match self.remote.list(self.config.kind).await {
            Ok(items) => {
                self.items.replace_all(T::reconcile(items));
                true
            }
            Err(err) => {
                warn!(error = %err, "Re-fetch after mutation failed; patching locally");
                false
            }
        }
    }

    fn succeed(&self, verb: &str) {
        self.notifier
            .notify(Notice::success(format!("{} {verb}", capitalize(self.config.kind.noun()))));
    }

    /// Report an unknown id the same way every other failure is reported.
    pub(crate) fn missing(&self, id: &RecordId) -> MutationError {
        self.fail(MutationError::NotFound(id.clone()))
    }

    fn fail(&self, err: MutationError) -> MutationError {
        if err.is_validation() {
            debug!(error = %err, "Mutation rejected by validation");
        } else {
            warn!(error = %err, "Mutation failed");
        }
        self.notifier.notify(Notice::error(err.user_message()));
        err
    }
}

fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
