//! Company parameter records (industries, company types, sizes, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Draft, ManagedEntity};
use crate::types::{RecordId, RecordStatus};
use crate::validation::{self, ValidationError};

/// Kind-specific part of a parameter record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordDetails {
    #[default]
    Plain,
    /// Company size bracket, e.g. `"51-200"`.
    SizeBracket { range: String },
}

impl RecordDetails {
    #[must_use]
    pub fn range(&self) -> Option<&str> {
        match self {
            Self::Plain => None,
            Self::SizeBracket { range } => Some(range),
        }
    }

    fn from_range(range: Option<String>) -> Self {
        range.map_or(Self::Plain, |range| Self::SizeBracket { range })
    }
}

/// A single company parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordWire", into = "RecordWire")]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub status: RecordStatus,
    /// Number of companies referencing this parameter.
    pub usage: u32,
    pub details: RecordDetails,
}

impl Record {
    /// Plain record with only a name, mostly for seeding and tests.
    #[must_use]
    pub fn named(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: RecordStatus::Active,
            usage: 0,
            details: RecordDetails::Plain,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.details = RecordDetails::SizeBracket {
            range: range.into(),
        };
        self
    }
}

#[derive(Serialize, Deserialize)]
struct RecordWire {
    id: RecordId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    status: RecordStatus,
    #[serde(default)]
    usage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
}

impl From<RecordWire> for Record {
    fn from(wire: RecordWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            description: wire.description.filter(|d| !d.trim().is_empty()),
            status: wire.status,
            usage: wire.usage,
            details: RecordDetails::from_range(wire.range),
        }
    }
}

impl From<Record> for RecordWire {
    fn from(record: Record) -> Self {
        let range = record.details.range().map(str::to_owned);
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            status: record.status,
            usage: record.usage,
            range,
        }
    }
}

/// Create/edit form for a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecordDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl RecordDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }
}

impl Draft for RecordDraft {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Partial update; unset fields are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

/// Edits never change the status; only toggling does. A draft without a
/// description leaves the current one in place.
impl From<RecordDraft> for RecordPatch {
    fn from(draft: RecordDraft) -> Self {
        Self {
            name: Some(draft.name.trim().to_owned()),
            description: draft.description.map(|d| d.trim().to_owned()),
            status: None,
            range: draft.range.map(|r| r.trim().to_owned()),
        }
    }
}

impl ManagedEntity for Record {
    type Draft = RecordDraft;
    type Patch = RecordPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.details.range());
        fields
    }

    fn from_draft(id: RecordId, draft: RecordDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_owned(),
            description: draft
                .description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            status: draft.status,
            usage: 0,
            details: RecordDetails::from_range(draft.range.map(|r| r.trim().to_owned())),
        }
    }

    fn apply(&mut self, patch: &RecordPatch, _now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            name.trim().clone_into(&mut self.name);
        }
        if let Some(description) = &patch.description {
            let description = description.trim();
            self.description = (!description.is_empty()).then(|| description.to_owned());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(range) = &patch.range {
            self.details = RecordDetails::SizeBracket {
                range: range.trim().to_owned(),
            };
        }
    }

    fn validate_patch(patch: &RecordPatch) -> Result<(), ValidationError> {
        validation::require_name_if_set(patch.name.as_deref())
    }

    fn status(&self) -> Option<RecordStatus> {
        Some(self.status)
    }

    fn status_patch(status: RecordStatus) -> Option<RecordPatch> {
        Some(RecordPatch {
            status: Some(status),
            ..RecordPatch::default()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entity::matches_search;

    #[test]
    fn test_wire_format_with_range() {
        let json = r#"{"id": 3, "name": "Medium", "range": "51-200", "usage": 12}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_str(), "3");
        assert_eq!(record.details.range(), Some("51-200"));
        assert_eq!(record.status, RecordStatus::Active);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["range"], "51-200");
        assert!(back.get("description").is_none());
    }

    #[test]
    fn test_plain_record_has_no_range_on_wire() {
        let record = Record::named("1", "Healthcare");
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("range").is_none());
        assert_eq!(value["status"], "active");
    }

    #[test]
    fn test_status_patch_serializes_only_status() {
        let patch = Record::status_patch(RecordStatus::Inactive).unwrap();
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "inactive" }));
    }

    #[test]
    fn test_search_covers_description_and_range() {
        let record = Record::named("s1", "Small")
            .with_description("Growing teams")
            .with_range("11-50");
        assert!(matches_search(&record, "GROWING"));
        assert!(matches_search(&record, "11-5"));
        assert!(!matches_search(&record, "enterprise"));
    }

    #[test]
    fn test_apply_clears_blank_description() {
        let mut record = Record::named("1", "Retail").with_description("Shops");
        let patch = RecordPatch {
            description: Some("  ".to_string()),
            ..RecordPatch::default()
        };
        record.apply(&patch, Utc::now());
        assert_eq!(record.description, None);
        assert_eq!(record.name, "Retail");
    }

    #[test]
    fn test_edit_keeps_status_and_unset_description() {
        let mut record = Record::named("l1", "Remote").with_description("Work from anywhere");
        record.status = RecordStatus::Inactive;

        let patch = RecordPatch::from(RecordDraft::new("Remote-first"));
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "name": "Remote-first" }));

        record.apply(&patch, Utc::now());
        assert_eq!(record.name, "Remote-first");
        assert_eq!(record.status, RecordStatus::Inactive);
        assert_eq!(record.description.as_deref(), Some("Work from anywhere"));
    }

    #[test]
    fn test_from_draft_trims() {
        let draft = RecordDraft::new("  Logistics ").description(" ");
        let record = Record::from_draft(RecordId::new("x"), draft, Utc::now());
        assert_eq!(record.name, "Logistics");
        assert_eq!(record.description, None);
        assert_eq!(record.details, RecordDetails::Plain);
    }
}
