//! Role permission editing.

use jobboard_core::{Permission, RecordId, Role};

use crate::error::MutationError;
use crate::remote::RemoteAdapter;
use crate::store::{Change, CrudStore};

impl<A: RemoteAdapter<Role>> CrudStore<Role, A> {
    /// Add a permission to a role. Sends the complete new permission set.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] for an unknown role, otherwise see
    /// [`CrudStore::patch`].
    pub async fn grant(
        &mut self,
        id: &RecordId,
        permission: Permission,
    ) -> Result<Change<Role>, MutationError> {
        let Some(patch) = self.get(id).map(|role| role.grant_patch(permission)) else {
            return Err(self.missing(id));
        };
        self.patch(id, patch).await
    }

    /// Remove a permission from a role.
    ///
    /// # Errors
    ///
    /// Same as [`CrudStore::grant`].
    pub async fn revoke(
        &mut self,
        id: &RecordId,
        permission: Permission,
    ) -> Result<Change<Role>, MutationError> {
        let Some(patch) = self.get(id).map(|role| role.revoke_patch(permission)) else {
            return Err(self.missing(id));
        };
        self.patch(id, patch).await
    }

    /// Roles that include `permission`.
    #[must_use]
    pub fn holding(&self, permission: Permission) -> Vec<&Role> {
        self.items()
            .iter()
            .filter(|role| role.has_permission(permission))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use jobboard_core::{EntityKind, RoleDraft};

    use super::*;
    use crate::notify::{NoticeLevel, NoticeQueue};

    #[tokio::test]
    async fn test_grant_and_revoke() {
        let queue = Arc::new(NoticeQueue::new());
        let mut roles = CrudStore::<Role>::local(EntityKind::Role, queue.clone());
        let created = roles
            .create(RoleDraft::new("Moderator", [Permission::ManageNews]))
            .await
            .unwrap();
        let id = created.record().unwrap().id.clone();

        roles.grant(&id, Permission::ManageJobs).await.unwrap();
        assert!(roles.get(&id).unwrap().has_permission(Permission::ManageJobs));
        assert_eq!(roles.holding(Permission::ManageNews).len(), 1);

        roles.revoke(&id, Permission::ManageNews).await.unwrap();
        assert!(roles.holding(Permission::ManageNews).is_empty());
        assert_eq!(roles.get(&id).unwrap().permissions.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_role() {
        let queue = Arc::new(NoticeQueue::new());
        let mut roles = CrudStore::<Role>::local(EntityKind::Role, queue.clone());
        let err = roles
            .grant(&RecordId::new("missing"), Permission::ViewReports)
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::NotFound(_)));

        let notices = queue.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);

        roles
            .revoke(&RecordId::new("missing"), Permission::ViewReports)
            .await
            .unwrap_err();
        assert_eq!(queue.drain().len(), 1);
    }
}
