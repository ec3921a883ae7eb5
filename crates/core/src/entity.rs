//! Entity kinds and the contract shared by every managed record type.
//!
//! Each management tab works on one [`EntityKind`]. Whether that kind lives
//! only in client memory or is backed by the remote API is decided once, by
//! the [`EntityConfig`] handed to the store at construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{RecordId, RecordStatus};
use crate::validation::{self, ValidationError};

/// Discriminator for every collection the admin panels manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Industry,
    CompanyType,
    CompanySize,
    JobCategory,
    Location,
    Role,
    User,
    News,
}

impl EntityKind {
    /// Company parameter tabs, in display order.
    pub const PARAMETERS: [Self; 5] = [
        Self::Industry,
        Self::CompanyType,
        Self::CompanySize,
        Self::JobCategory,
        Self::Location,
    ];

    /// Wire name used to key remote calls.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Industry => "industry",
            Self::CompanyType => "company_type",
            Self::CompanySize => "company_size",
            Self::JobCategory => "job_category",
            Self::Location => "location",
            Self::Role => "role",
            Self::User => "user",
            Self::News => "news",
        }
    }

    /// Lower-case singular noun for notifications ("industry created").
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Industry => "industry",
            Self::CompanyType => "company type",
            Self::CompanySize => "company size",
            Self::JobCategory => "job category",
            Self::Location => "location",
            Self::Role => "role",
            Self::User => "user",
            Self::News => "news item",
        }
    }

    /// Tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Industry => "Industries",
            Self::CompanyType => "Company Types",
            Self::CompanySize => "Company Sizes",
            Self::JobCategory => "Job Categories",
            Self::Location => "Locations",
            Self::Role => "Roles",
            Self::User => "Users",
            Self::News => "News",
        }
    }

    #[must_use]
    pub const fn is_parameter(self) -> bool {
        matches!(
            self,
            Self::Industry | Self::CompanyType | Self::CompanySize | Self::JobCategory | Self::Location
        )
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "industry" | "industries" => Ok(Self::Industry),
            "company_type" | "company_types" => Ok(Self::CompanyType),
            "company_size" | "company_sizes" | "sizes" => Ok(Self::CompanySize),
            "job_category" | "job_categories" => Ok(Self::JobCategory),
            "location" | "locations" => Ok(Self::Location),
            "role" | "roles" => Ok(Self::Role),
            "user" | "users" => Ok(Self::User),
            "news" => Ok(Self::News),
            _ => Err(format!("unknown entity kind: {s}")),
        }
    }
}

/// How local state catches up after a confirmed remote mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterMutation {
    /// Re-fetch the whole list from the backend.
    Refetch,
    /// Patch the confirmed record into the local list.
    Patch,
}

/// Where a kind's source of truth lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Client memory only; mutations always succeed and never hit the network.
    LocalOnly,
    /// Backend first; local state changes only after the call succeeds.
    Remote(AfterMutation),
}

impl SyncMode {
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Per-kind strategy: sync mode, editable fields and display columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityConfig {
    pub kind: EntityKind,
    pub mode: SyncMode,
    /// Whether records of this kind carry a size `range`.
    pub has_range: bool,
    /// Column headers of the management table.
    pub columns: &'static [&'static str],
}

const PARAMETER_COLUMNS: &[&str] = &["Name", "Description", "Usage", "Status"];
const SIZE_COLUMNS: &[&str] = &["Name", "Range", "Description", "Usage", "Status"];

impl EntityConfig {
    /// The configuration the admin panels ship with.
    ///
    /// Industries and company types are backed by the company-parameter API;
    /// the other parameter tabs are still mock data held in memory.
    #[must_use]
    pub const fn default_for(kind: EntityKind) -> Self {
        let (mode, has_range, columns): (SyncMode, bool, &'static [&'static str]) = match kind {
            EntityKind::Industry | EntityKind::CompanyType => (
                SyncMode::Remote(AfterMutation::Refetch),
                false,
                PARAMETER_COLUMNS,
            ),
            EntityKind::CompanySize => (SyncMode::LocalOnly, true, SIZE_COLUMNS),
            EntityKind::JobCategory | EntityKind::Location => {
                (SyncMode::LocalOnly, false, PARAMETER_COLUMNS)
            }
            EntityKind::Role => (
                SyncMode::Remote(AfterMutation::Refetch),
                false,
                &["Role", "Description", "Permissions", "Users"],
            ),
            EntityKind::User => (
                SyncMode::Remote(AfterMutation::Patch),
                false,
                &["Name", "Email", "Role", "Status"],
            ),
            EntityKind::News => (
                SyncMode::Remote(AfterMutation::Refetch),
                false,
                &["Title", "Type", "Published", "Active"],
            ),
        };
        Self {
            kind,
            mode,
            has_range,
            columns,
        }
    }

    /// Same kind, forced to the given mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: SyncMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Form data submitted to create (or fully edit) a record.
pub trait Draft: Clone + Send + Sync {
    /// The required display name (title for news items).
    fn name(&self) -> &str;

    /// Validate the draft before anything else happens.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first failing field.
    fn validate(&self) -> Result<(), ValidationError> {
        validation::require_name(self.name())
    }
}

/// A record type the CRUD stores can manage.
pub trait ManagedEntity: Clone + Send + Sync + 'static {
    /// Create/edit form payload.
    type Draft: Draft;
    /// Partial update payload; only set fields are sent or applied.
    type Patch: Clone + Send + Sync + From<Self::Draft>;

    fn id(&self) -> &RecordId;

    /// Name shown in confirmations and notifications.
    fn label(&self) -> &str;

    /// Text fields the search box matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Build a record locally, for kinds that never reach the backend.
    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Apply a partial update in place.
    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>);

    /// Check a partial update before it is applied or sent.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a set field is invalid.
    fn validate_patch(_patch: &Self::Patch) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Current status, for kinds that have one.
    fn status(&self) -> Option<RecordStatus> {
        None
    }

    /// Patch carrying only a status change.
    fn status_patch(_status: RecordStatus) -> Option<Self::Patch> {
        None
    }

    /// Cross-record checks against the current collection (e.g. unique email).
    ///
    /// `editing` is the id of the record being edited, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the draft conflicts with another record.
    fn check_conflicts(
        _draft: &Self::Draft,
        _existing: &[Self],
        _editing: Option<&RecordId>,
    ) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Canonicalize a freshly fetched or about-to-be-persisted list.
    #[must_use]
    fn reconcile(items: Vec<Self>) -> Vec<Self> {
        items
    }
}

/// Case-insensitive substring match over the record's searchable fields.
///
/// A blank term matches everything.
#[must_use]
pub fn matches_search<T: ManagedEntity>(item: &T, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}
