//! Job-board admin library.
//!
//! Owned CRUD stores for the admin management panels, the mutation executor
//! that keeps them in sync with the backend, and the HTTP adapter.
//!
//! # Modules
//!
//! - [`store`] - [`CrudStore`]: local-only or remote-backed mutations
//! - [`collection`] - Ordered record list with unique ids
//! - [`panel`] - Multi-tab company parameter view
//! - [`remote`] - [`RemoteAdapter`] contract and the [`ApiClient`] implementation
//! - [`services`] - News, role and user specific operations
//! - [`notify`] / [`confirm`] - Injected notification and confirmation collaborators

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collection;
pub mod config;
pub mod confirm;
pub mod error;
pub mod notify;
pub mod panel;
pub mod remote;
pub mod services;
pub mod store;

pub use collection::Collection;
pub use config::{AdminConfig, ApiConfig, ConfigError};
pub use confirm::{AlwaysConfirm, Confirm};
pub use error::MutationError;
pub use notify::{Notice, NoticeLevel, NoticeQueue, Notifier, TracingNotifier};
pub use panel::ParameterPanel;
pub use remote::{ApiClient, Offline, RemoteAdapter, RemoteError};
pub use store::{Change, CrudStore};
