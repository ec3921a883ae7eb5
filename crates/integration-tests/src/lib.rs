//! Integration tests for the job-board admin stores.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jobboard-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `parameter_panel` - Multi-tab parameter panel, local and remote tabs
//! - `news_reconcile` - Deduplication of fetched and persisted news
//! - `user_directory` - Admin-created accounts
//! - `role_management` - Role permissions
//!
//! Every scenario runs against [`FakeBackend`], an in-memory stand-in for the
//! REST backend with per-operation failure injection and a call log.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use jobboard_admin::{NoticeQueue, RemoteAdapter, RemoteError};
use jobboard_core::{EntityKind, ManagedEntity, RecordId};

/// Backend operation, for failure injection and call assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Update,
    Remove,
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub kind: EntityKind,
    pub id: Option<RecordId>,
}

struct State<T> {
    items: HashMap<EntityKind, Vec<T>>,
    failing: HashSet<Op>,
    calls: Vec<Call>,
    next_id: u64,
}

/// In-memory backend shared by every clone.
pub struct FakeBackend<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for FakeBackend<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for FakeBackend<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                items: HashMap::new(),
                failing: HashSet::new(),
                calls: Vec::new(),
                next_id: 1,
            })),
        }
    }
}

impl<T: ManagedEntity> FakeBackend<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload the list for `kind`.
    #[must_use]
    pub fn with_items(self, kind: EntityKind, items: Vec<T>) -> Self {
        self.lock().items.insert(kind, items);
        self
    }

    /// Make every future `op` call fail with a request error.
    pub fn fail(&self, op: Op) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.lock().failing.remove(&op);
    }

    /// Server-side list for `kind`.
    #[must_use]
    pub fn items(&self, kind: EntityKind) -> Vec<T> {
        self.lock().items.get(&kind).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn ops(&self) -> Vec<Op> {
        self.lock().calls.iter().map(|call| call.op).collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(
        &self,
        op: Op,
        kind: EntityKind,
        id: Option<&RecordId>,
    ) -> Result<MutexGuard<'_, State<T>>, RemoteError> {
        let mut state = self.lock();
        state.calls.push(Call {
            op,
            kind,
            id: id.cloned(),
        });
        if state.failing.contains(&op) {
            return Err(RemoteError::Request(format!("injected {op:?} failure")));
        }
        Ok(state)
    }
}

impl<T: ManagedEntity> RemoteAdapter<T> for FakeBackend<T> {
    async fn list(&self, kind: EntityKind) -> Result<Vec<T>, RemoteError> {
        let state = self.begin(Op::List, kind, None)?;
        Ok(state.items.get(&kind).cloned().unwrap_or_default())
    }

    async fn create(&self, kind: EntityKind, fields: &T::Draft) -> Result<T, RemoteError> {
        let mut state = self.begin(Op::Create, kind, None)?;
        let id = RecordId::new(format!("srv-{}", state.next_id));
        state.next_id += 1;
        let item = T::from_draft(id, fields.clone(), Utc::now());
        state.items.entry(kind).or_default().push(item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &RecordId,
        patch: &T::Patch,
    ) -> Result<T, RemoteError> {
        let mut state = self.begin(Op::Update, kind, Some(id))?;
        let item = state
            .items
            .get_mut(&kind)
            .and_then(|items| items.iter_mut().find(|item| item.id() == id))
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        item.apply(patch, Utc::now());
        Ok(item.clone())
    }

    async fn remove(&self, kind: EntityKind, id: &RecordId) -> Result<(), RemoteError> {
        let mut state = self.begin(Op::Remove, kind, Some(id))?;
        let items = state.items.entry(kind).or_default();
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Fresh notice queue, shared with the store under test.
#[must_use]
pub fn notices() -> Arc<NoticeQueue> {
    Arc::new(NoticeQueue::new())
}
