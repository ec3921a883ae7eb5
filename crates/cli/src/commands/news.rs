//! News commands.
//!
//! # Usage
//!
//! ```bash
//! # Collapse duplicate items in an export, newest first
//! jb-cli news dedupe news.json --output clean.json
//!
//! # Publish or unpublish an item on the backend
//! jb-cli news publish 42
//! jb-cli news unpublish 42
//! ```

use std::path::Path;

use jobboard_core::{EntityKind, ManagedEntity, NewsItem, RecordId};
use serde::Deserialize;

use super::entities::report;
use super::{Context, emit};
use crate::error::CliError;

/// Exports come either as a bare array or wrapped in `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NewsFile {
    Wrapped { data: Vec<NewsItem> },
    Bare(Vec<NewsItem>),
}

/// Parse a news export and return its reconciled contents.
///
/// # Errors
///
/// Returns [`CliError::Json`] if the text is not a news list.
pub fn dedupe_json(text: &str) -> Result<Vec<NewsItem>, CliError> {
    let items = match serde_json::from_str::<NewsFile>(text)? {
        NewsFile::Wrapped { data } | NewsFile::Bare(data) => data,
    };
    let before = items.len();
    let merged = NewsItem::reconcile(items);
    tracing::info!(before, after = merged.len(), "Reconciled news file");
    Ok(merged)
}

/// Reconcile a news file offline, writing to `output` or stdout.
///
/// # Errors
///
/// Returns [`CliError`] on I/O or JSON errors.
pub fn dedupe(input: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let text = std::fs::read_to_string(input)?;
    let merged = dedupe_json(&text)?;
    let json = serde_json::to_string_pretty(&merged)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), count = merged.len(), "Wrote reconciled news");
        }
        None => emit([json]),
    }
    Ok(())
}

/// Set the published flag of one item.
///
/// # Errors
///
/// Returns [`CliError`] if the store cannot be loaded or the update fails.
pub async fn set_published(ctx: &Context, id: &str, published: bool) -> Result<(), CliError> {
    let mut news = ctx.open::<NewsItem>(EntityKind::News, Vec::new()).await?;
    let change = news.set_published(&RecordId::new(id), published).await?;
    report(&change);
    Ok(())
}
