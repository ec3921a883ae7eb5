//! Status and classification enums for managed entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by company parameters and accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn from_active(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("invalid status: {s}")),
        }
    }
}

/// Content kind of a news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    Youtube,
    #[default]
    Link,
    Image,
    Banner,
    Svg,
    Poster,
    Video,
    Announcement,
    Article,
}

impl NewsKind {
    pub const ALL: [Self; 9] = [
        Self::Youtube,
        Self::Link,
        Self::Image,
        Self::Banner,
        Self::Svg,
        Self::Poster,
        Self::Video,
        Self::Announcement,
        Self::Article,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Link => "link",
            Self::Image => "image",
            Self::Banner => "banner",
            Self::Svg => "svg",
            Self::Poster => "poster",
            Self::Video => "video",
            Self::Announcement => "announcement",
            Self::Article => "article",
        }
    }
}

impl std::fmt::Display for NewsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NewsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("invalid news type: {s}"))
    }
}

/// Account type of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Candidate browsing and applying for jobs.
    JobSeeker,
    /// Company account posting jobs.
    Employer,
    /// Staff member with access to the management panels.
    Admin,
    /// Staff member who can also manage other staff and roles.
    SuperAdmin,
}

impl AccountRole {
    /// Whether the account belongs to platform staff.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JobSeeker => write!(f, "job_seeker"),
            Self::Employer => write!(f, "employer"),
            Self::Admin => write!(f, "admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job_seeker" | "jobseeker" => Ok(Self::JobSeeker),
            "employer" => Ok(Self::Employer),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(format!("invalid account role: {s}")),
        }
    }
}
