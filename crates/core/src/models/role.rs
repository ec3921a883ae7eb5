//! Staff roles and their permission sets.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Draft, ManagedEntity};
use crate::types::{Permission, RecordId};
use crate::validation::{self, ValidationError};

const DEFAULT_COLOR: &str = "#6b7280";

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
    #[serde(default)]
    pub user_count: u32,
    /// Badge color, display only.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Role {
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Patch that adds `permission` to this role's current set.
    #[must_use]
    pub fn grant_patch(&self, permission: Permission) -> RolePatch {
        let mut permissions = self.permissions.clone();
        permissions.insert(permission);
        RolePatch::permissions(permissions)
    }

    /// Patch that removes `permission` from this role's current set.
    #[must_use]
    pub fn revoke_patch(&self, permission: Permission) -> RolePatch {
        let mut permissions = self.permissions.clone();
        permissions.remove(&permission);
        RolePatch::permissions(permissions)
    }
}

/// Create/edit form for a role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDraft {
    pub name: String,
    pub description: String,
    pub permissions: BTreeSet<Permission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl RoleDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Draft for RoleDraft {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Partial update of a role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeSet<Permission>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl RolePatch {
    #[must_use]
    pub fn permissions(permissions: BTreeSet<Permission>) -> Self {
        Self {
            permissions: Some(permissions),
            ..Self::default()
        }
    }
}

impl From<RoleDraft> for RolePatch {
    fn from(draft: RoleDraft) -> Self {
        Self {
            name: Some(draft.name.trim().to_owned()),
            description: Some(draft.description),
            permissions: Some(draft.permissions),
            color: draft.color,
        }
    }
}

impl ManagedEntity for Role {
    type Draft = RoleDraft;
    type Patch = RolePatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }

    fn from_draft(id: RecordId, draft: RoleDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_owned(),
            description: draft.description,
            permissions: draft.permissions,
            user_count: 0,
            color: draft.color.unwrap_or_else(default_color),
        }
    }

    fn apply(&mut self, patch: &RolePatch, _now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            name.trim().clone_into(&mut self.name);
        }
        if let Some(description) = &patch.description {
            description.clone_into(&mut self.description);
        }
        if let Some(permissions) = &patch.permissions {
            self.permissions.clone_from(permissions);
        }
        if let Some(color) = &patch.color {
            color.clone_into(&mut self.color);
        }
    }

    fn validate_patch(patch: &RolePatch) -> Result<(), ValidationError> {
        validation::require_name_if_set(patch.name.as_deref())
    }
}
