//! Job-board core - shared types library.
//!
//! This crate provides the types used across all job-board admin components:
//! - `admin` - Entity stores, mutation executor and the remote adapter
//! - `cli` - Command-line tools for managing entities against the backend
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O,
//! no HTTP clients, no logging. Everything here can be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, statuses and permissions
//! - [`models`] - Entity records (company parameters, news, roles, users)
//! - [`entity`] - Entity kinds, per-kind sync configuration and the
//!   [`ManagedEntity`] contract the stores operate on
//! - [`reconcile`] - Content-key deduplication of fetched lists
//! - [`validation`] - Field validation shared by every entity kind

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entity;
pub mod models;
pub mod reconcile;
pub mod types;
pub mod validation;

pub use entity::{
    AfterMutation, Draft, EntityConfig, EntityKind, ManagedEntity, SyncMode, matches_search,
};
pub use models::*;
pub use types::*;
pub use validation::ValidationError;
