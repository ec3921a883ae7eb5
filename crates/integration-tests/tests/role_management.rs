//! Integration tests for role permission editing.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use jobboard_admin::{CrudStore, MutationError, NoticeLevel, NoticeQueue};
use jobboard_core::{
    EntityConfig, EntityKind, ManagedEntity, Permission, RecordId, Role, RoleDraft,
    ValidationError,
};
use jobboard_integration_tests::{FakeBackend, Op, notices};

fn role(id: &str, name: &str, permissions: &[Permission]) -> Role {
    let mut draft = RoleDraft::new(name, permissions.iter().copied());
    draft.description = format!("{name} staff");
    Role::from_draft(RecordId::new(id), draft, Utc::now())
}

async fn roles(backend: &FakeBackend<Role>) -> CrudStore<Role, FakeBackend<Role>> {
    roles_notifying(backend, &notices()).await
}

async fn roles_notifying(
    backend: &FakeBackend<Role>,
    queue: &Arc<NoticeQueue>,
) -> CrudStore<Role, FakeBackend<Role>> {
    let mut store = CrudStore::<Role, _>::new(
        EntityConfig::default_for(EntityKind::Role),
        backend.clone(),
        queue.clone(),
    );
    store.refresh().await.unwrap();
    backend.clear_calls();
    store
}

fn backend() -> FakeBackend<Role> {
    FakeBackend::new().with_items(
        EntityKind::Role,
        vec![
            role("r1", "Editor", &[Permission::ManageNews]),
            role("r2", "Recruiter", &[Permission::ManageJobs, Permission::ViewApplications]),
        ],
    )
}

#[tokio::test]
async fn test_grant_sends_full_set_and_refetches() {
    let backend = backend();
    let mut store = roles(&backend).await;

    let id = RecordId::new("r1");
    store.grant(&id, Permission::ViewReports).await.unwrap();

    assert_eq!(backend.ops(), [Op::Update, Op::List]);
    let editor = store.get(&id).unwrap();
    assert!(editor.has_permission(Permission::ManageNews));
    assert!(editor.has_permission(Permission::ViewReports));
    assert_eq!(store.holding(Permission::ViewReports).len(), 1);
}

#[tokio::test]
async fn test_revoke_removes_permission() {
    let backend = backend();
    let mut store = roles(&backend).await;

    let id = RecordId::new("r2");
    store.revoke(&id, Permission::ManageJobs).await.unwrap();

    assert!(!store.get(&id).unwrap().has_permission(Permission::ManageJobs));
    assert!(store.holding(Permission::ManageJobs).is_empty());
    assert_eq!(backend.items(EntityKind::Role)[1].permissions.len(), 1);
}

#[tokio::test]
async fn test_unknown_role_is_not_found() {
    let backend = backend();
    let queue = notices();
    let mut store = roles_notifying(&backend, &queue).await;
    queue.drain();

    let err = store
        .grant(&RecordId::new("missing"), Permission::ManageUsers)
        .await
        .unwrap_err();
    assert!(matches!(err, MutationError::NotFound(_)));
    assert!(backend.calls().is_empty());

    let notices = queue.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_roles_cannot_be_toggled() {
    let backend = backend();
    let mut store = roles(&backend).await;

    let err = store.toggle_status(&RecordId::new("r1")).await.unwrap_err();
    assert!(matches!(
        err,
        MutationError::Validation(ValidationError::NoStatus)
    ));
    assert!(backend.calls().is_empty());
}
