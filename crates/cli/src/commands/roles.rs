//! Role permission commands.
//!
//! # Usage
//!
//! ```bash
//! jb-cli roles grant 3 manage_news
//! jb-cli roles revoke 3 view_reports
//! ```

use jobboard_core::{EntityKind, Permission, RecordId, Role};

use super::Context;
use super::entities::report;
use crate::error::CliError;

/// Grant (`true`) or revoke (`false`) one permission.
///
/// # Errors
///
/// Returns [`CliError`] if the store cannot be loaded or the update fails.
pub async fn set_permission(
    ctx: &Context,
    id: &str,
    permission: Permission,
    granted: bool,
) -> Result<(), CliError> {
    let mut roles = ctx.open::<Role>(EntityKind::Role, Vec::new()).await?;
    let id = RecordId::new(id);
    let change = if granted {
        roles.grant(&id, permission).await?
    } else {
        roles.revoke(&id, permission).await?
    };
    report(&change);
    Ok(())
}
