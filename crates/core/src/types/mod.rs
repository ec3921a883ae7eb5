//! Core types for the job-board admin.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod permission;
pub mod status;

pub use email::{Email, EmailError};
pub use id::RecordId;
pub use permission::{Permission, PermissionError};
pub use status::*;
