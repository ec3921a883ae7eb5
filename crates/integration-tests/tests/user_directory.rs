//! Integration tests for admin-created accounts.
//!
//! Users are remote-backed and patched in place after each confirmed call;
//! the list is never re-fetched after a mutation.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use jobboard_admin::{Change, CrudStore, MutationError, NoticeLevel, NoticeQueue};
use jobboard_core::{
    AccountRole, AdminUser, Email, EntityConfig, EntityKind, RecordId, RecordStatus, UserDraft,
    ValidationError,
};
use jobboard_integration_tests::{FakeBackend, Op, notices};
use secrecy::SecretString;

fn user(id: &str, name: &str, email: &str, status: RecordStatus) -> AdminUser {
    AdminUser {
        id: RecordId::new(id),
        name: name.to_string(),
        email: Email::parse(email).unwrap(),
        role: AccountRole::Admin,
        status,
        created_at: None,
    }
}

fn backend() -> FakeBackend<AdminUser> {
    FakeBackend::new().with_items(
        EntityKind::User,
        vec![
            user("u1", "Ada", "ada@jobs.test", RecordStatus::Active),
            user("u2", "Bob", "bob@jobs.test", RecordStatus::Inactive),
        ],
    )
}

async fn directory(
    backend: &FakeBackend<AdminUser>,
    queue: &Arc<NoticeQueue>,
) -> CrudStore<AdminUser, FakeBackend<AdminUser>> {
    let mut store = CrudStore::<AdminUser, _>::new(
        EntityConfig::default_for(EntityKind::User),
        backend.clone(),
        queue.clone(),
    )
    .with_confirm(Arc::new(|_: &str| true));
    store.refresh().await.unwrap();
    backend.clear_calls();
    store
}

#[tokio::test]
async fn test_duplicate_active_email_never_sent() {
    let backend = backend();
    let queue = notices();
    let mut store = directory(&backend, &queue).await;

    let email = Email::parse("ADA@jobs.test").unwrap();
    let draft = UserDraft::new("Ada Again", email, AccountRole::Admin);
    let err = store.create(draft).await.unwrap_err();

    assert!(matches!(
        err,
        MutationError::Validation(ValidationError::DuplicateEmail(_))
    ));
    assert!(backend.calls().is_empty());
    assert_eq!(store.items().len(), 2);

    let notices = queue.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("ada@jobs.test"));
}

#[tokio::test]
async fn test_email_of_inactive_account_is_reusable() {
    let backend = backend();
    let queue = notices();
    let mut store = directory(&backend, &queue).await;

    let email = Email::parse("bob@jobs.test").unwrap();
    let draft = UserDraft::new("Bobby", email, AccountRole::Employer);
    let change = store.create(draft).await.unwrap();

    assert_eq!(change.record().unwrap().id.as_str(), "srv-1");
    assert_eq!(backend.ops(), [Op::Create]);
    assert_eq!(store.items().len(), 3);
    assert_eq!(queue.drain()[0].message, "User created");
}

#[tokio::test]
async fn test_role_change_patches_without_refetch() {
    let backend = backend();
    let queue = notices();
    let mut store = directory(&backend, &queue).await;

    let id = RecordId::new("u1");
    store.change_role(&id, AccountRole::SuperAdmin).await.unwrap();

    assert_eq!(backend.ops(), [Op::Update]);
    assert_eq!(store.get(&id).unwrap().role, AccountRole::SuperAdmin);
    assert_eq!(store.active_staff().len(), 1);
}

#[tokio::test]
async fn test_toggle_reactivates_account() {
    let backend = backend();
    let queue = notices();
    let mut store = directory(&backend, &queue).await;

    let id = RecordId::new("u2");
    store.toggle_status(&id).await.unwrap();

    assert_eq!(store.get(&id).unwrap().status, RecordStatus::Active);
    assert_eq!(backend.ops(), [Op::Update]);
    assert_eq!(queue.drain()[0].message, "User activated");
}

#[tokio::test]
async fn test_delete_filters_locally() {
    let backend = backend();
    let queue = notices();
    let mut store = directory(&backend, &queue).await;

    let id = RecordId::new("u2");
    let change = store.delete(&id).await.unwrap();

    assert_eq!(change, Change::Removed(id.clone()));
    assert_eq!(backend.ops(), [Op::Remove]);
    assert!(store.get(&id).is_none());
    assert_eq!(backend.items(EntityKind::User).len(), 1);
}

#[tokio::test]
async fn test_reset_password_checks_length_first() {
    let backend = backend();
    let queue = notices();
    let mut store = directory(&backend, &queue).await;
    let id = RecordId::new("u1");

    let short = SecretString::from("short".to_string());
    assert!(store.reset_password(&id, short).await.unwrap_err().is_validation());
    assert!(backend.calls().is_empty());

    let strong = SecretString::from("correct-horse-battery".to_string());
    store.reset_password(&id, strong).await.unwrap();
    assert_eq!(backend.ops(), [Op::Update]);
    assert_eq!(store.get(&id).unwrap().name, "Ada");
}

#[tokio::test]
async fn test_backend_rejection_keeps_role() {
    let backend = backend();
    let queue = notices();
    let mut store = directory(&backend, &queue).await;
    backend.fail(Op::Update);

    let id = RecordId::new("u1");
    let err = store.change_role(&id, AccountRole::JobSeeker).await.unwrap_err();

    assert!(matches!(err, MutationError::Remote(_)));
    assert_eq!(store.get(&id).unwrap().role, AccountRole::Admin);
    assert_eq!(queue.drain()[0].level, NoticeLevel::Error);
}
