//! Registry store: every registered entry, partitioned by kind.
//!
//! Only reachable through `ModuleManager`. Writes are upserts (last one wins),
//! reads are plain gets; nothing here keeps per-request state.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::component::ComponentFactory;
use crate::i18n::LangBundle;
use crate::menu::MenuItem;
use crate::service_hub::ServiceHub;

/// Disjoint key spaces for UI components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    App,
    Auth,
    Settings,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::App, Namespace::Auth, Namespace::Settings];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Auth => "auth",
            Self::Settings => "settings",
        }
    }

    /// URL of `slug` inside this namespace, e.g. `/app/dashboard`.
    #[must_use]
    pub fn url(self, slug: &str) -> String {
        format!("/{}/{slug}", self.as_str())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuKind {
    Main,
    Settings,
}

#[derive(Default)]
pub struct RegistryStore {
    app: RwLock<HashMap<String, ComponentFactory>>,
    auth: RwLock<HashMap<String, ComponentFactory>>,
    settings: RwLock<HashMap<String, ComponentFactory>>,
    menu: RwLock<HashMap<String, MenuItem>>,
    menu_settings: RwLock<HashMap<String, MenuItem>>,
    langs: RwLock<HashMap<String, LangBundle>>,
    modules: RwLock<HashSet<String>>,
    services: ServiceHub,
}

impl RegistryStore {
    fn components(&self, ns: Namespace) -> &RwLock<HashMap<String, ComponentFactory>> {
        match ns {
            Namespace::App => &self.app,
            Namespace::Auth => &self.auth,
            Namespace::Settings => &self.settings,
        }
    }

    fn menus(&self, kind: MenuKind) -> &RwLock<HashMap<String, MenuItem>> {
        match kind {
            MenuKind::Main => &self.menu,
            MenuKind::Settings => &self.menu_settings,
        }
    }

    /// Returns `true` when an earlier entry was replaced.
    pub fn set_component(&self, ns: Namespace, key: &str, component: ComponentFactory) -> bool {
        self.components(ns)
            .write()
            .insert(key.to_owned(), component)
            .is_some()
    }

    pub fn component(&self, ns: Namespace, key: &str) -> Option<ComponentFactory> {
        self.components(ns).read().get(key).cloned()
    }

    pub fn component_keys(&self, ns: Namespace) -> Vec<String> {
        let mut keys: Vec<String> = self.components(ns).read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Menu entries are keyed by label.
    pub fn set_menu(&self, kind: MenuKind, item: MenuItem) -> bool {
        self.menus(kind)
            .write()
            .insert(item.label.clone(), item)
            .is_some()
    }

    pub fn menu_items(&self, kind: MenuKind) -> Vec<MenuItem> {
        self.menus(kind).read().values().cloned().collect()
    }

    pub fn set_langs(&self, module: &str, bundle: LangBundle) -> bool {
        self.langs
            .write()
            .insert(module.to_owned(), bundle)
            .is_some()
    }

    pub fn langs(&self, module: &str) -> Option<LangBundle> {
        self.langs.read().get(module).cloned()
    }

    /// Snapshot of every `(module key, bundle)` pair.
    pub fn all_langs(&self) -> Vec<(String, LangBundle)> {
        let mut all: Vec<(String, LangBundle)> = self
            .langs
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        all.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Marks a feature module as registered; `false` if it already was.
    pub fn mark_module(&self, name: &str) -> bool {
        self.modules.write().insert(name.to_owned())
    }

    pub fn modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.read().iter().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn services(&self) -> &ServiceHub {
        &self.services
    }

    pub fn clear(&self) {
        for ns in Namespace::ALL {
            self.components(ns).write().clear();
        }
        self.menu.write().clear();
        self.menu_settings.write().clear();
        self.langs.write().clear();
        self.modules.write().clear();
        self.services.clear();
    }
}

impl fmt::Debug for RegistryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryStore")
            .field("app", &self.component_keys(Namespace::App))
            .field("auth", &self.component_keys(Namespace::Auth))
            .field("settings", &self.component_keys(Namespace::Settings))
            .field("menu", &self.menu.read().len())
            .field("menu_settings", &self.menu_settings.read().len())
            .field("langs", &self.langs.read().len())
            .field("modules", &self.modules())
            .field("services", &self.services)
            .finish()
    }
}
