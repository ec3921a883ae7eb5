//! Company parameter panel: one store per tab, an active tab and a shared
//! search term.

use std::collections::BTreeMap;
use std::sync::Arc;

use jobboard_core::{EntityConfig, EntityKind, Record, SyncMode};
use tracing::{info, instrument};

use crate::confirm::Confirm;
use crate::error::MutationError;
use crate::notify::Notifier;
use crate::remote::RemoteAdapter;
use crate::store::CrudStore;

/// Multi-tab view over the company parameter collections.
///
/// Every tab shares one adapter; whether a tab ever calls it is decided by
/// that tab's [`EntityConfig`].
#[derive(Debug)]
pub struct ParameterPanel<A> {
    tabs: BTreeMap<EntityKind, CrudStore<Record, A>>,
    active: EntityKind,
    search: String,
}

impl<A: RemoteAdapter<Record> + Clone> ParameterPanel<A> {
    /// Panel with the default configuration for every parameter tab.
    #[must_use]
    pub fn new(remote: A, notifier: Arc<dyn Notifier>, confirm: Option<Arc<dyn Confirm>>) -> Self {
        Self::with_configs(
            EntityKind::PARAMETERS.map(EntityConfig::default_for),
            remote,
            notifier,
            confirm,
        )
    }

    /// Panel with explicit per-tab configurations.
    ///
    /// The first configuration becomes the active tab.
    #[must_use]
    pub fn with_configs(
        configs: impl IntoIterator<Item = EntityConfig>,
        remote: A,
        notifier: Arc<dyn Notifier>,
        confirm: Option<Arc<dyn Confirm>>,
    ) -> Self {
        let mut active = None;
        let tabs = configs
            .into_iter()
            .map(|config| {
                active.get_or_insert(config.kind);
                let store =
                    CrudStore::<Record, A>::new(config.clone(), remote.clone(), notifier.clone());
                let store = match &confirm {
                    Some(confirm) => store.with_confirm(confirm.clone()),
                    None => store,
                };
                (config.kind, store)
            })
            .collect();

        Self {
            tabs,
            active: active.unwrap_or(EntityKind::Industry),
            search: String::new(),
        }
    }

    /// Load remote-backed tabs and seed local-only tabs with sample data.
    ///
    /// Every tab is attempted; a failed tab keeps its previous contents.
    ///
    /// # Errors
    ///
    /// Returns the first load failure, after all tabs have been tried.
    #[instrument(skip_all)]
    pub async fn initialize(&mut self) -> Result<(), MutationError> {
        let mut first_error = None;
        for (kind, store) in &mut self.tabs {
            if store.config().mode == SyncMode::LocalOnly {
                store.replace_items(seed_records(*kind));
                continue;
            }
            if let Err(err) = store.refresh().await {
                first_error.get_or_insert(err);
            }
        }
        info!(tabs = self.tabs.len(), "Parameter panel initialized");
        first_error.map_or(Ok(()), Err)
    }

    /// Switch the active tab. Returns `false` if the panel has no such tab.
    pub fn select_tab(&mut self, kind: EntityKind) -> bool {
        if !self.tabs.contains_key(&kind) {
            return false;
        }
        self.active = kind;
        true
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn active_kind(&self) -> EntityKind {
        self.active
    }

    /// Kinds in tab order.
    pub fn tab_kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.tabs.keys().copied()
    }

    #[must_use]
    pub fn active_config(&self) -> Option<&EntityConfig> {
        self.active().map(CrudStore::config)
    }

    #[must_use]
    pub fn active(&self) -> Option<&CrudStore<Record, A>> {
        self.tabs.get(&self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut CrudStore<Record, A>> {
        self.tabs.get_mut(&self.active)
    }

    #[must_use]
    pub fn store(&self, kind: EntityKind) -> Option<&CrudStore<Record, A>> {
        self.tabs.get(&kind)
    }

    pub fn store_mut(&mut self, kind: EntityKind) -> Option<&mut CrudStore<Record, A>> {
        self.tabs.get_mut(&kind)
    }

    /// Active tab's records filtered by the current search term.
    #[must_use]
    pub fn visible(&self) -> Vec<&Record> {
        self.active()
            .map(|store| store.filtered(&self.search))
            .unwrap_or_default()
    }
}

/// Sample rows for tabs that have no backend yet.
#[must_use]
pub fn seed_records(kind: EntityKind) -> Vec<Record> {
    match kind {
        EntityKind::Industry => vec![
            Record::named("industry-1", "Information Technology")
                .with_description("Software, hardware and IT services"),
            Record::named("industry-2", "Banking & Finance")
                .with_description("Banks, insurers and investment firms"),
            Record::named("industry-3", "Healthcare").with_description("Hospitals and clinics"),
        ],
        EntityKind::CompanyType => vec![
            Record::named("company_type-1", "Private Limited"),
            Record::named("company_type-2", "Public Limited"),
            Record::named("company_type-3", "Startup"),
            Record::named("company_type-4", "Non-Profit"),
        ],
        EntityKind::CompanySize => vec![
            Record::named("company_size-1", "Startup").with_range("1-10"),
            Record::named("company_size-2", "Small").with_range("11-50"),
            Record::named("company_size-3", "Medium").with_range("51-200"),
            Record::named("company_size-4", "Large").with_range("201-1000"),
            Record::named("company_size-5", "Enterprise").with_range("1000+"),
        ],
        EntityKind::JobCategory => vec![
            Record::named("job_category-1", "Engineering")
                .with_description("Software and hardware engineering roles"),
            Record::named("job_category-2", "Sales & Marketing"),
            Record::named("job_category-3", "Design"),
            Record::named("job_category-4", "Customer Support"),
            Record::named("job_category-5", "Operations"),
        ],
        EntityKind::Location => vec![
            Record::named("location-1", "Remote"),
            Record::named("location-2", "New York, NY"),
            Record::named("location-3", "San Francisco, CA"),
            Record::named("location-4", "London, UK"),
            Record::named("location-5", "Berlin, Germany"),
        ],
        EntityKind::Role | EntityKind::User | EntityKind::News => Vec::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jobboard_core::{RecordDraft, RecordId};

    use super::*;
    use crate::notify::NoticeQueue;
    use crate::remote::{Offline, RemoteError};

    fn offline_panel(queue: &Arc<NoticeQueue>) -> ParameterPanel<Offline> {
        let configs = EntityKind::PARAMETERS
            .map(|kind| EntityConfig::default_for(kind).with_mode(SyncMode::LocalOnly));
        ParameterPanel::with_configs(configs, Offline, queue.clone(), None)
    }

    #[tokio::test]
    async fn test_initialize_seeds_local_tabs() {
        let queue = Arc::new(NoticeQueue::new());
        let mut panel = offline_panel(&queue);
        panel.initialize().await.unwrap();

        assert_eq!(panel.active_kind(), EntityKind::Industry);
        assert_eq!(panel.visible().len(), 3);
        let sizes = panel.store(EntityKind::CompanySize).unwrap();
        assert_eq!(sizes.items().len(), 5);
        assert!(queue.drain().is_empty());
    }

    #[tokio::test]
    async fn test_remote_tab_failure_is_reported() {
        let queue = Arc::new(NoticeQueue::new());
        let mut panel = ParameterPanel::new(Offline, queue.clone(), None);

        let err = panel.initialize().await.unwrap_err();
        assert!(matches!(err, MutationError::Remote(RemoteError::Offline)));
        // Local tabs are still seeded.
        assert_eq!(panel.store(EntityKind::Location).unwrap().items().len(), 5);
        assert!(panel.store(EntityKind::Industry).unwrap().items().is_empty());
        assert_eq!(queue.drain().len(), 2);
    }

    #[tokio::test]
    async fn test_search_follows_active_tab() {
        let queue = Arc::new(NoticeQueue::new());
        let mut panel = offline_panel(&queue);
        panel.initialize().await.unwrap();

        panel.set_search("tech");
        let names: Vec<_> = panel.visible().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Information Technology"]);

        assert!(panel.select_tab(EntityKind::CompanySize));
        panel.set_search("1000");
        let names: Vec<_> = panel.visible().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Large", "Enterprise"]);
        assert!(panel.active_config().unwrap().has_range);

        assert!(!panel.select_tab(EntityKind::News));
        assert_eq!(panel.active_kind(), EntityKind::CompanySize);
    }

    #[tokio::test]
    async fn test_create_goes_to_active_tab() {
        let queue = Arc::new(NoticeQueue::new());
        let mut panel = offline_panel(&queue);
        panel.initialize().await.unwrap();
        panel.select_tab(EntityKind::JobCategory);

        let store = panel.active_mut().unwrap();
        store.create(RecordDraft::new("Finance")).await.unwrap();
        assert_eq!(panel.active().unwrap().items().len(), 6);
        assert_eq!(panel.store(EntityKind::Industry).unwrap().items().len(), 3);
        assert!(
            panel
                .active()
                .unwrap()
                .get(&RecordId::new("job_category-1"))
                .is_some()
        );
    }
}
