//! ModKit for the Scribe shell: module registry, service hub and bootstrap.
//!
//! Feature modules register UI components (per `Namespace`), menu entries,
//! localization bundles and service implementations through the manager's
//! subscribe surface; shell pages read them back through the components surface.

#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod component;
pub mod config;
pub mod context;
pub mod i18n;
pub mod manager;
pub mod menu;
pub mod navigation;
pub mod notify;
mod registry;
pub mod security;
pub mod service_hub;
pub mod telemetry;

pub use bootstrap::{BootstrapReport, FeatureModule, bootstrap};
pub use component::{Component, ComponentFactory, RenderCtx, View, escape_html, from_fn, page};
pub use config::{ConfigError, ConfigProvider, StaticConfigProvider};
pub use context::ModuleCtx;
pub use i18n::{LangBundle, TranslationTable};
pub use manager::{Components, ManagerState, ModuleManager, Subscribe};
pub use menu::MenuItem;
pub use navigation::{Navigation, Navigator, RecordingNavigator, RouteRequest, SessionToken};
pub use notify::{Level, LogNotifier, Notification, Notifier, ToastBuffer};
pub use registry::Namespace;
pub use security::SecurityCtx;
pub use service_hub::{ServiceError, ServiceHub, ServiceKind, ServiceName};
