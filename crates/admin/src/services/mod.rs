//! Kind-specific operations layered on [`CrudStore`](crate::store::CrudStore).
//!
//! # Services
//!
//! - `news` - Reconciled persistence, import and publishing
//! - `roles` - Permission grant/revoke
//! - `users` - Role, status and password changes for admin-created accounts

pub mod news;
pub mod roles;
pub mod users;
