//! Admin user commands beyond plain CRUD.
//!
//! # Usage
//!
//! ```bash
//! jb-cli users role 12 super_admin
//! jb-cli users status 12 inactive
//! echo 'new long password' | jb-cli users reset-password 12
//! ```

use std::io::BufRead;

use jobboard_core::{AccountRole, AdminUser, EntityKind, RecordId, RecordStatus};
use secrecy::SecretString;

use super::Context;
use super::entities::report;
use crate::error::CliError;

/// Change a user's account role.
///
/// # Errors
///
/// Returns [`CliError`] if the store cannot be loaded or the update fails.
pub async fn change_role(ctx: &Context, id: &str, role: AccountRole) -> Result<(), CliError> {
    let mut users = ctx.open::<AdminUser>(EntityKind::User, Vec::new()).await?;
    let change = users.change_role(&RecordId::new(id), role).await?;
    report(&change);
    Ok(())
}

/// Set a user's status.
///
/// # Errors
///
/// Returns [`CliError`] if the store cannot be loaded or the update fails.
pub async fn set_status(ctx: &Context, id: &str, status: RecordStatus) -> Result<(), CliError> {
    let mut users = ctx.open::<AdminUser>(EntityKind::User, Vec::new()).await?;
    let change = users.set_status(&RecordId::new(id), status).await?;
    report(&change);
    Ok(())
}

/// Reset a user's password, reading the new one from the first line of stdin.
///
/// # Errors
///
/// Returns [`CliError`] if stdin cannot be read, the password is too short,
/// or the update fails.
pub async fn reset_password(ctx: &Context, id: &str) -> Result<(), CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = SecretString::from(line.trim_end_matches(['\r', '\n']).to_owned());

    let mut users = ctx.open::<AdminUser>(EntityKind::User, Vec::new()).await?;
    let change = users.reset_password(&RecordId::new(id), password).await?;
    report(&change);
    Ok(())
}
