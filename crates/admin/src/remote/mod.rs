//! Remote sync adapter: list/create/update/remove against the backend.
//!
//! This module provides:
//! - [`RemoteAdapter`], the contract the stores depend on
//! - [`ApiClient`], the JSON-over-HTTP implementation
//! - [`Offline`], a stand-in for stores whose kinds never leave memory
//!
//! Calls are keyed by [`EntityKind`] and record id. Every call may fail; the
//! stores turn failures into notifications and leave local state alone.

mod client;
mod error;

pub use client::ApiClient;
pub use error::RemoteError;

use std::future::Future;

use jobboard_core::{EntityKind, ManagedEntity, RecordId};

/// Backend operations for one entity type.
pub trait RemoteAdapter<T: ManagedEntity>: Send + Sync {
    /// Fetch the full list for `kind`.
    fn list(&self, kind: EntityKind) -> impl Future<Output = Result<Vec<T>, RemoteError>> + Send;

    /// Create a record and return it as stored by the backend.
    fn create(
        &self,
        kind: EntityKind,
        fields: &T::Draft,
    ) -> impl Future<Output = Result<T, RemoteError>> + Send;

    /// Apply a partial update and return the updated record.
    fn update(
        &self,
        kind: EntityKind,
        id: &RecordId,
        patch: &T::Patch,
    ) -> impl Future<Output = Result<T, RemoteError>> + Send;

    /// Delete a record.
    fn remove(
        &self,
        kind: EntityKind,
        id: &RecordId,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// Adapter for stores with no backend; every call fails with
/// [`RemoteError::Offline`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl<T: ManagedEntity> RemoteAdapter<T> for Offline {
    async fn list(&self, _kind: EntityKind) -> Result<Vec<T>, RemoteError> {
        Err(RemoteError::Offline)
    }

    async fn create(&self, _kind: EntityKind, _fields: &T::Draft) -> Result<T, RemoteError> {
        Err(RemoteError::Offline)
    }

    async fn update(
        &self,
        _kind: EntityKind,
        _id: &RecordId,
        _patch: &T::Patch,
    ) -> Result<T, RemoteError> {
        Err(RemoteError::Offline)
    }

    async fn remove(&self, _kind: EntityKind, _id: &RecordId) -> Result<(), RemoteError> {
        Err(RemoteError::Offline)
    }
}
