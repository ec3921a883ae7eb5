//! Command implementations.
//!
//! Every command opens one store for its kind, loads it (from the backend
//! for remote-backed kinds, from sample data for local-only ones) and runs a
//! single operation through it.

pub mod entities;
pub mod news;
pub mod roles;
pub mod users;

use std::io::{BufRead, Write};
use std::sync::Arc;

use jobboard_admin::{
    AdminConfig, AlwaysConfirm, ApiClient, Confirm, CrudStore, Notifier, RemoteAdapter,
    TracingNotifier,
};
use jobboard_core::{EntityConfig, EntityKind, ManagedEntity};

use crate::backend::Backend;
use crate::error::CliError;

/// Shared state for one invocation.
pub struct Context {
    config: Option<AdminConfig>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn Confirm>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("configured", &self.config.is_some())
            .finish_non_exhaustive()
    }
}

impl Context {
    /// `config` may be absent; local-only kinds work without it.
    #[must_use]
    pub fn new(config: Option<AdminConfig>, assume_yes: bool) -> Self {
        let confirm: Arc<dyn Confirm> = if assume_yes {
            Arc::new(AlwaysConfirm)
        } else {
            Arc::new(StdinConfirm)
        };
        Self {
            config,
            notifier: Arc::new(TracingNotifier),
            confirm,
        }
    }

    fn backend(&self, config: &EntityConfig) -> Result<Backend, CliError> {
        if !config.mode.is_remote() {
            return Ok(Backend::Offline);
        }
        // Reload to surface the original configuration error.
        let app_config = match &self.config {
            Some(app_config) => app_config.clone(),
            None => AdminConfig::from_env()?,
        };
        Ok(Backend::Api(ApiClient::new(app_config.api())?))
    }

    /// Open and load the store for `kind`.
    ///
    /// Local-only kinds start from `seed`.
    pub async fn open<T>(
        &self,
        kind: EntityKind,
        seed: Vec<T>,
    ) -> Result<CrudStore<T, Backend>, CliError>
    where
        T: ManagedEntity,
        Backend: RemoteAdapter<T>,
    {
        let config = EntityConfig::default_for(kind);
        let backend = self.backend(&config)?;
        let remote = config.mode.is_remote();
        let mut store = CrudStore::<T, Backend>::new(config, backend, self.notifier.clone())
            .with_confirm(self.confirm.clone());

        if remote {
            store.refresh().await?;
        } else {
            store.replace_items(seed);
        }
        Ok(store)
    }
}

/// Asks on stderr and reads the answer from stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = std::io::stderr().lock();
        if write!(stderr, "{message} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Write result lines to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}
