//! Adapter selection for one CLI invocation.

use jobboard_admin::{ApiClient, Offline, RemoteAdapter, RemoteError};
use jobboard_core::{EntityKind, ManagedEntity, RecordId};

/// The HTTP client for remote-backed kinds, or nothing for local-only ones.
#[derive(Debug, Clone)]
pub enum Backend {
    Api(ApiClient),
    Offline,
}

impl<T> RemoteAdapter<T> for Backend
where
    T: ManagedEntity,
    ApiClient: RemoteAdapter<T>,
{
    async fn list(&self, kind: EntityKind) -> Result<Vec<T>, RemoteError> {
        match self {
            Self::Api(client) => <ApiClient as RemoteAdapter<T>>::list(client, kind).await,
            Self::Offline => <Offline as RemoteAdapter<T>>::list(&Offline, kind).await,
        }
    }

    async fn create(&self, kind: EntityKind, fields: &T::Draft) -> Result<T, RemoteError> {
        match self {
            Self::Api(client) => <ApiClient as RemoteAdapter<T>>::create(client, kind, fields).await,
            Self::Offline => <Offline as RemoteAdapter<T>>::create(&Offline, kind, fields).await,
        }
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &RecordId,
        patch: &T::Patch,
    ) -> Result<T, RemoteError> {
        match self {
            Self::Api(client) => {
                <ApiClient as RemoteAdapter<T>>::update(client, kind, id, patch).await
            }
            Self::Offline => <Offline as RemoteAdapter<T>>::update(&Offline, kind, id, patch).await,
        }
    }

    async fn remove(&self, kind: EntityKind, id: &RecordId) -> Result<(), RemoteError> {
        match self {
            Self::Api(client) => <ApiClient as RemoteAdapter<T>>::remove(client, kind, id).await,
            Self::Offline => <Offline as RemoteAdapter<T>>::remove(&Offline, kind, id).await,
        }
    }
}
