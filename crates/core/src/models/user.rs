//! Platform accounts managed from the admin user table.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::entity::{Draft, ManagedEntity};
use crate::types::{AccountRole, Email, RecordId, RecordStatus};
use crate::validation::{self, ValidationError};

/// A platform account as listed in the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: RecordId,
    pub name: String,
    pub email: Email,
    /// Older endpoints call this field `type`.
    #[serde(alias = "type")]
    pub role: AccountRole,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Form for an admin-created account.
///
/// `Debug` is derived; `SecretString` prints as redacted.
#[derive(Debug, Clone, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: Email,
    pub role: AccountRole,
    #[serde(
        serialize_with = "expose_password",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,
}

impl UserDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, email: Email, role: AccountRole) -> Self {
        Self {
            name: name.into(),
            email,
            role,
            password: None,
        }
    }

    #[must_use]
    pub fn with_password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }
}

impl Draft for UserDraft {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_name(&self.name)?;
        if let Some(password) = &self.password {
            validation::require_password(password.expose_secret())?;
        }
        Ok(())
    }
}

/// Partial update: role change, status change, password reset or edit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AccountRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(
        serialize_with = "expose_password",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,
}

impl UserPatch {
    #[must_use]
    pub fn role(role: AccountRole) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn password(password: SecretString) -> Self {
        Self {
            password: Some(password),
            ..Self::default()
        }
    }
}

impl From<UserDraft> for UserPatch {
    fn from(draft: UserDraft) -> Self {
        Self {
            name: Some(draft.name.trim().to_owned()),
            email: Some(draft.email),
            role: Some(draft.role),
            status: None,
            password: draft.password,
        }
    }
}

fn expose_password<S: Serializer>(
    password: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match password {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

impl ManagedEntity for AdminUser {
    type Draft = UserDraft;
    type Patch = UserPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, self.email.as_str()]
    }

    fn from_draft(id: RecordId, draft: UserDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_owned(),
            email: draft.email,
            role: draft.role,
            status: RecordStatus::Active,
            created_at: Some(now),
        }
    }

    // Passwords are write-only; nothing to store locally.
    fn apply(&mut self, patch: &UserPatch, _now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            name.trim().clone_into(&mut self.name);
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn validate_patch(patch: &UserPatch) -> Result<(), ValidationError> {
        validation::require_name_if_set(patch.name.as_deref())?;
        if let Some(password) = &patch.password {
            validation::require_password(password.expose_secret())?;
        }
        Ok(())
    }

    fn status(&self) -> Option<RecordStatus> {
        Some(self.status)
    }

    fn status_patch(status: RecordStatus) -> Option<UserPatch> {
        Some(UserPatch {
            status: Some(status),
            ..UserPatch::default()
        })
    }

    fn check_conflicts(
        draft: &UserDraft,
        existing: &[Self],
        editing: Option<&RecordId>,
    ) -> Result<(), ValidationError> {
        let taken = existing.iter().any(|user| {
            user.status.is_active() && user.email == draft.email && Some(&user.id) != editing
        });
        if taken {
            return Err(ValidationError::DuplicateEmail(draft.email.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str, status: RecordStatus) -> AdminUser {
        AdminUser {
            id: RecordId::new(id),
            name: "Someone".to_string(),
            email: Email::parse(email).unwrap(),
            role: AccountRole::Employer,
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_accepts_legacy_type_field() {
        let json = r#"{"id": 5, "name": "Ana", "email": "ana@corp.io", "type": "job_seeker"}"#;
        let parsed: AdminUser = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.role, AccountRole::JobSeeker);
        assert_eq!(parsed.status, RecordStatus::Active);
    }

    #[test]
    fn test_email_unique_among_active_accounts() {
        let existing = vec![
            user("1", "taken@corp.io", RecordStatus::Active),
            user("2", "gone@corp.io", RecordStatus::Inactive),
        ];
        let draft = UserDraft::new(
            "New",
            Email::parse("TAKEN@corp.io").unwrap(),
            AccountRole::Admin,
        );
        assert_eq!(
            AdminUser::check_conflicts(&draft, &existing, None),
            Err(ValidationError::DuplicateEmail("taken@corp.io".to_string()))
        );
        // Editing the owner of the address is fine.
        assert!(AdminUser::check_conflicts(&draft, &existing, Some(&RecordId::new("1"))).is_ok());

        let reuse = UserDraft::new("New", Email::parse("gone@corp.io").unwrap(), AccountRole::Admin);
        assert!(AdminUser::check_conflicts(&reuse, &existing, None).is_ok());
    }

    #[test]
    fn test_password_sent_but_not_debugged() {
        let patch = UserPatch::password(SecretString::from("correct horse battery"));
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "password": "correct horse battery" }));
        assert!(!format!("{patch:?}").contains("correct horse"));
    }

    #[test]
    fn test_short_password_rejected() {
        let patch = UserPatch::password(SecretString::from("abc"));
        assert!(matches!(
            AdminUser::validate_patch(&patch),
            Err(ValidationError::WeakPassword { .. })
        ));
    }
}
