//! Permission vocabulary for staff roles.
//!
//! Roles may only carry tokens from this fixed list. Unknown tokens coming
//! from the backend fail deserialization instead of being silently kept.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Permission`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown permission: {0}")]
pub struct PermissionError(pub String);

/// A single permission token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ManageRoles,
    ManageCompanies,
    ManageJobs,
    ManageNews,
    ManageSettings,
    ViewReports,
    ViewApplications,
    PostJobs,
    ApplyJobs,
}

impl Permission {
    /// Every permission, in display order.
    pub const ALL: [Self; 10] = [
        Self::ManageUsers,
        Self::ManageRoles,
        Self::ManageCompanies,
        Self::ManageJobs,
        Self::ManageNews,
        Self::ManageSettings,
        Self::ViewReports,
        Self::ViewApplications,
        Self::PostJobs,
        Self::ApplyJobs,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageUsers => "manage_users",
            Self::ManageRoles => "manage_roles",
            Self::ManageCompanies => "manage_companies",
            Self::ManageJobs => "manage_jobs",
            Self::ManageNews => "manage_news",
            Self::ManageSettings => "manage_settings",
            Self::ViewReports => "view_reports",
            Self::ViewApplications => "view_applications",
            Self::PostJobs => "post_jobs",
            Self::ApplyJobs => "apply_jobs",
        }
    }

    /// Human readable label used in role editors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ManageUsers => "Manage users",
            Self::ManageRoles => "Manage roles",
            Self::ManageCompanies => "Manage companies",
            Self::ManageJobs => "Manage jobs",
            Self::ManageNews => "Manage news",
            Self::ManageSettings => "Manage settings",
            Self::ViewReports => "View reports",
            Self::ViewApplications => "View applications",
            Self::PostJobs => "Post jobs",
            Self::ApplyJobs => "Apply to jobs",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == token)
            .ok_or_else(|| PermissionError(token.to_owned()))
    }
}
