//! Module manager: the single access point to the registry.
//!
//! Two disjoint surfaces:
//! - `subscribe()` (write side), called by each feature module while it registers;
//! - `components()` (read side), called by resolvers and pages at request time.
//!
//! An application normally builds one manager at bootstrap and passes it around
//! in an `Arc`. `ModuleManager::global()` gives a lazily created process-wide
//! instance for code that cannot receive one explicitly.

use arc_swap::ArcSwap;
use std::sync::{Arc, OnceLock};

use crate::component::ComponentFactory;
use crate::i18n::{DEFAULT_LOCALE, LangBundle, LocaleCode, TranslationTable};
use crate::menu::MenuItem;
use crate::registry::{MenuKind, Namespace, RegistryStore};
use crate::service_hub::{ServiceError, ServiceHub, ServiceKind, ServiceName};

static GLOBAL: OnceLock<Arc<ModuleManager>> = OnceLock::new();

/// Lifecycle of the process-wide manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Uninitialized,
    Ready,
}

#[derive(Debug)]
pub struct ModuleManager {
    store: RegistryStore,
    default_locale: LocaleCode,
    translations: ArcSwap<TranslationTable>,
}

impl Default for ModuleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_locale(DEFAULT_LOCALE)
    }

    #[must_use]
    pub fn with_default_locale(default_locale: impl Into<LocaleCode>) -> Self {
        let default_locale = default_locale.into();
        Self {
            store: RegistryStore::default(),
            translations: ArcSwap::from_pointee(TranslationTable::new(default_locale.clone())),
            default_locale,
        }
    }

    /// Process-wide manager, created on first access.
    pub fn global() -> &'static Arc<ModuleManager> {
        GLOBAL.get_or_init(|| {
            tracing::debug!("creating global module manager");
            Arc::new(ModuleManager::new())
        })
    }

    #[must_use]
    pub fn global_state() -> ManagerState {
        if GLOBAL.get().is_some() {
            ManagerState::Ready
        } else {
            ManagerState::Uninitialized
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> Subscribe<'_> {
        Subscribe { manager: self }
    }

    #[must_use]
    pub fn components(&self) -> Components<'_> {
        Components { manager: self }
    }

    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Names of the feature modules registered so far.
    #[must_use]
    pub fn modules(&self) -> Vec<String> {
        self.store.modules()
    }

    /// Drop every entry. Meant for test teardown.
    pub fn reset(&self) {
        self.store.clear();
        self.rebuild_translations();
    }

    pub(crate) fn mark_module(&self, name: &str) -> bool {
        self.store.mark_module(name)
    }

    fn rebuild_translations(&self) {
        let bundles = self.store.all_langs();
        let table = TranslationTable::from_bundles(
            self.default_locale.clone(),
            bundles.iter().map(|(k, v)| (k.as_str(), v)),
        );
        self.translations.store(Arc::new(table));
    }
}

/// Write side. Every call is a plain upsert; a later registration under the
/// same key silently replaces the earlier one.
#[derive(Clone, Copy)]
pub struct Subscribe<'a> {
    manager: &'a ModuleManager,
}

impl Subscribe<'_> {
    pub fn app(&self, key: &str, component: ComponentFactory) {
        self.component(Namespace::App, key, component);
    }

    pub fn auth(&self, key: &str, component: ComponentFactory) {
        self.component(Namespace::Auth, key, component);
    }

    pub fn settings(&self, key: &str, component: ComponentFactory) {
        self.component(Namespace::Settings, key, component);
    }

    pub fn component(&self, ns: Namespace, key: &str, component: ComponentFactory) {
        let replaced = self.manager.store.set_component(ns, key, component);
        tracing::debug!(namespace = %ns, key, replaced, "component registered");
    }

    pub fn menu(&self, item: MenuItem) {
        let label = item.label.clone();
        let replaced = self.manager.store.set_menu(MenuKind::Main, item);
        tracing::debug!(label = %label, replaced, "menu item registered");
    }

    pub fn menu_settings(&self, item: MenuItem) {
        let label = item.label.clone();
        let replaced = self.manager.store.set_menu(MenuKind::Settings, item);
        tracing::debug!(label = %label, replaced, "settings menu item registered");
    }

    pub fn langs(&self, module_key: &str, bundle: LangBundle) {
        let replaced = self.manager.store.set_langs(module_key, bundle);
        self.manager.rebuild_translations();
        tracing::debug!(module = module_key, replaced, "localization bundle registered");
    }

    pub fn service<K: ServiceKind>(&self, service: Arc<K::Api>) {
        self.manager.store.services().register::<K>(service);
        tracing::debug!(service = %K::NAME, "service registered");
    }
}

/// Read side. Lookups never mutate the registry.
#[derive(Clone, Copy)]
pub struct Components<'a> {
    manager: &'a ModuleManager,
}

impl<'a> Components<'a> {
    #[must_use]
    pub fn app(&self, key: &str) -> Option<ComponentFactory> {
        self.component(Namespace::App, key)
    }

    #[must_use]
    pub fn auth(&self, key: &str) -> Option<ComponentFactory> {
        self.component(Namespace::Auth, key)
    }

    #[must_use]
    pub fn settings(&self, key: &str) -> Option<ComponentFactory> {
        self.component(Namespace::Settings, key)
    }

    #[must_use]
    pub fn component(&self, ns: Namespace, key: &str) -> Option<ComponentFactory> {
        self.manager.store.component(ns, key)
    }

    /// Registered keys of a namespace, sorted.
    #[must_use]
    pub fn keys(&self, ns: Namespace) -> Vec<String> {
        self.manager.store.component_keys(ns)
    }

    /// Main menu entries in no particular order; see `menu::sort_by_order`.
    #[must_use]
    pub fn menus(&self) -> Vec<MenuItem> {
        self.manager.store.menu_items(MenuKind::Main)
    }

    #[must_use]
    pub fn menu_settings(&self) -> Vec<MenuItem> {
        self.manager.store.menu_items(MenuKind::Settings)
    }

    /// Optional service: `None` means the module is not installed.
    #[must_use]
    pub fn services<K: ServiceKind>(&self) -> Option<Arc<K::Api>> {
        self.manager.store.services().get::<K>()
    }

    /// Mandatory service.
    ///
    /// # Errors
    /// `ServiceError::NotRegistered` carrying the service name when it is missing.
    pub fn require_service<K: ServiceKind>(&self) -> Result<Arc<K::Api>, ServiceError> {
        self.manager.store.services().require::<K>()
    }

    #[must_use]
    pub fn has_service(&self, name: ServiceName) -> bool {
        self.manager.store.services().contains(name)
    }

    #[must_use]
    pub fn service_hub(&self) -> &'a ServiceHub {
        self.manager.store.services()
    }

    #[must_use]
    pub fn langs(&self, module_key: &str) -> Option<LangBundle> {
        self.manager.store.langs(module_key)
    }

    /// Current merged translation table.
    #[must_use]
    pub fn translations(&self) -> Arc<TranslationTable> {
        self.manager.translations.load_full()
    }
}
