//! Admin-created accounts: role, status and password changes.

use jobboard_core::{AccountRole, AdminUser, ManagedEntity, RecordId, RecordStatus, UserPatch};
use secrecy::SecretString;
use tracing::instrument;

use crate::error::MutationError;
use crate::remote::RemoteAdapter;
use crate::store::{Change, CrudStore};

impl<A: RemoteAdapter<AdminUser>> CrudStore<AdminUser, A> {
    /// Move a user to another account role.
    ///
    /// # Errors
    ///
    /// See [`CrudStore::patch`].
    pub async fn change_role(
        &mut self,
        id: &RecordId,
        role: AccountRole,
    ) -> Result<Change<AdminUser>, MutationError> {
        self.patch(id, UserPatch::role(role)).await
    }

    /// Set a user's status explicitly, rather than toggling it.
    ///
    /// # Errors
    ///
    /// See [`CrudStore::patch`].
    pub async fn set_status(
        &mut self,
        id: &RecordId,
        status: RecordStatus,
    ) -> Result<Change<AdminUser>, MutationError> {
        let patch = AdminUser::status_patch(status).unwrap_or_default();
        self.patch(id, patch).await
    }

    /// Set a new password. The secret is only ever sent, never stored or logged.
    ///
    /// # Errors
    ///
    /// Returns a validation error for passwords that are too short, otherwise
    /// see [`CrudStore::patch`].
    #[instrument(skip_all, fields(id = %id))]
    pub async fn reset_password(
        &mut self,
        id: &RecordId,
        password: SecretString,
    ) -> Result<Change<AdminUser>, MutationError> {
        self.patch(id, UserPatch::password(password)).await
    }

    /// Active accounts holding a staff role.
    #[must_use]
    pub fn active_staff(&self) -> Vec<&AdminUser> {
        self.items()
            .iter()
            .filter(|user| user.status.is_active() && user.role.is_staff())
            .collect()
    }
}
