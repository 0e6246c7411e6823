//! Typed service hub keyed by a closed set of service names.
//!
//! Design goals:
//! - Providers register one implementation per well-known service name.
//! - Consumers resolve by a `ServiceKind` marker and get back the capability
//!   trait object, so `get::<OAuthService>()` is statically an `Arc<dyn AuthApi>`.
//! - Two resolution modes: `require` for mandatory features (fails loudly with
//!   the service name), `get` for optional ones (`None` = module not installed).
//!
//! Implementation details:
//! - Key = `ServiceName`. Value = `Arc<K::Api>` stored as `Box<dyn Any + Send + Sync>`
//!   and downcast on read.
//! - Sync hot path: lookups are non-async and never mutate the map.
//!
//! Notes:
//! - Re-registering overwrites the previous value; `Arc`s already handed out stay valid.
//! - `remove` and `clear` exist for tests.

use parking_lot::RwLock;
use std::{any::Any, collections::HashMap, fmt, str::FromStr, sync::Arc};

/// Well-known service names. Each one maps to exactly one capability interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceName {
    OAuth,
    Templates,
    Subscriptions,
    MedicalApi,
}

impl ServiceName {
    pub const ALL: [ServiceName; 4] = [
        ServiceName::OAuth,
        ServiceName::Templates,
        ServiceName::Subscriptions,
        ServiceName::MedicalApi,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OAuth => "oauth",
            Self::Templates => "templates",
            Self::Subscriptions => "subscriptions",
            Self::MedicalApi => "medical-api",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown service name '{0}'")]
pub struct UnknownServiceName(pub String);

impl FromStr for ServiceName {
    type Err = UnknownServiceName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownServiceName(s.to_owned()))
    }
}

/// Binds a `ServiceName` to the capability trait object registered under it.
///
/// SDK crates declare one zero-sized marker per capability:
/// ```ignore
/// pub struct OAuthService;
/// impl ServiceKind for OAuthService {
///     const NAME: ServiceName = ServiceName::OAuth;
///     type Api = dyn AuthApi;
/// }
/// ```
pub trait ServiceKind: 'static {
    const NAME: ServiceName;
    type Api: ?Sized + Send + Sync + 'static;
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service not registered: {name}")]
    NotRegistered { name: ServiceName },

    #[error("service '{name}' is registered with a capability other than {expected}")]
    TypeMismatch {
        name: ServiceName,
        expected: &'static str,
    },
}

type Boxed = Box<dyn Any + Send + Sync>;

/// Registry of service implementations keyed by `ServiceName`.
pub struct ServiceHub {
    map: RwLock<HashMap<ServiceName, Boxed>>,
}

impl ServiceHub {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for ServiceHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHub")
            .field("registered", &self.names())
            .finish()
    }
}

impl ServiceHub {
    /// Register the implementation of `K`, replacing any previous one.
    pub fn register<K: ServiceKind>(&self, service: Arc<K::Api>) {
        let replaced = self.map.write().insert(K::NAME, Box::new(service));
        if replaced.is_some() {
            tracing::debug!(service = %K::NAME, "service re-registered, previous implementation replaced");
        }
    }

    /// Optional resolution: `None` when the service is not installed.
    #[must_use]
    pub fn get<K: ServiceKind>(&self) -> Option<Arc<K::Api>> {
        self.map
            .read()
            .get(&K::NAME)
            .and_then(|boxed| boxed.downcast_ref::<Arc<K::Api>>())
            .cloned()
    }

    /// Mandatory resolution.
    ///
    /// # Errors
    /// `ServiceError::NotRegistered` when nothing is registered under `K::NAME`,
    /// `ServiceError::TypeMismatch` when the stored value belongs to another capability.
    pub fn require<K: ServiceKind>(&self) -> Result<Arc<K::Api>, ServiceError> {
        let r = self.map.read();
        let boxed = r
            .get(&K::NAME)
            .ok_or(ServiceError::NotRegistered { name: K::NAME })?;

        boxed
            .downcast_ref::<Arc<K::Api>>()
            .cloned()
            .ok_or(ServiceError::TypeMismatch {
                name: K::NAME,
                expected: std::any::type_name::<K::Api>(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: ServiceName) -> bool {
        self.map.read().contains_key(&name)
    }

    /// Registered names in declaration order of `ServiceName`.
    #[must_use]
    pub fn names(&self) -> Vec<ServiceName> {
        let r = self.map.read();
        let mut names: Vec<ServiceName> = r.keys().copied().collect();
        names.sort();
        names
    }

    /// Remove the implementation of `K`; returns it if it was present.
    pub fn remove<K: ServiceKind>(&self) -> Option<Arc<K::Api>> {
        let boxed = self.map.write().remove(&K::NAME)?;
        boxed.downcast::<Arc<K::Api>>().ok().map(|b| *b)
    }

    /// Clear everything (useful in tests).
    pub fn clear(&self) {
        self.map.write().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[async_trait::async_trait]
    trait GreeterApi: Send + Sync {
        async fn greet(&self) -> String;
    }

    trait CounterApi: Send + Sync {
        fn count(&self) -> usize;
    }

    struct Greeter(&'static str);

    #[async_trait::async_trait]
    impl GreeterApi for Greeter {
        async fn greet(&self) -> String {
            format!("hello from {}", self.0)
        }
    }

    struct Counter(usize);

    impl CounterApi for Counter {
        fn count(&self) -> usize {
            self.0
        }
    }

    struct GreeterService;
    impl ServiceKind for GreeterService {
        const NAME: ServiceName = ServiceName::OAuth;
        type Api = dyn GreeterApi;
    }

    struct CounterService;
    impl ServiceKind for CounterService {
        const NAME: ServiceName = ServiceName::Templates;
        type Api = dyn CounterApi;
    }

    // Claims the oauth name with a different capability.
    struct ImpostorService;
    impl ServiceKind for ImpostorService {
        const NAME: ServiceName = ServiceName::OAuth;
        type Api = dyn CounterApi;
    }

    #[tokio::test]
    async fn register_and_resolve_typed_capability() {
        let hub = ServiceHub::new();
        let api: Arc<dyn GreeterApi> = Arc::new(Greeter("a"));
        hub.register::<GreeterService>(api.clone());

        let got = hub.require::<GreeterService>().unwrap();
        assert_eq!(got.greet().await, "hello from a");
        assert!(Arc::ptr_eq(&api, &got));
        assert!(hub.get::<GreeterService>().is_some());
    }

    #[test]
    fn require_fails_with_service_name_when_missing() {
        let hub = ServiceHub::new();

        let err = hub.require::<GreeterService>().err().unwrap();
        assert!(matches!(
            err,
            ServiceError::NotRegistered {
                name: ServiceName::OAuth
            }
        ));
        assert!(err.to_string().contains("oauth"));
    }

    #[test]
    fn get_returns_none_when_missing() {
        let hub = ServiceHub::new();
        assert!(hub.get::<GreeterService>().is_none());
    }

    #[tokio::test]
    async fn re_registering_overwrites_and_keeps_old_arcs_alive() {
        let hub = ServiceHub::new();
        hub.register::<GreeterService>(Arc::new(Greeter("first")));
        let old = hub.get::<GreeterService>().unwrap();

        hub.register::<GreeterService>(Arc::new(Greeter("second")));

        assert_eq!(old.greet().await, "hello from first");
        assert_eq!(
            hub.get::<GreeterService>().unwrap().greet().await,
            "hello from second"
        );
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn mismatched_capability_is_reported_by_require_only() {
        let hub = ServiceHub::new();
        hub.register::<GreeterService>(Arc::new(Greeter("a")));

        assert!(hub.get::<ImpostorService>().is_none());
        let err = hub.require::<ImpostorService>().err().unwrap();
        assert!(matches!(err, ServiceError::TypeMismatch { .. }));
    }

    #[test]
    fn names_remove_and_clear() {
        let hub = ServiceHub::new();
        hub.register::<CounterService>(Arc::new(Counter(3)));
        hub.register::<GreeterService>(Arc::new(Greeter("a")));

        assert_eq!(
            hub.names(),
            vec![ServiceName::OAuth, ServiceName::Templates]
        );
        assert!(hub.contains(ServiceName::Templates));

        let removed = hub.remove::<CounterService>().unwrap();
        assert_eq!(removed.count(), 3);
        assert!(!hub.contains(ServiceName::Templates));

        hub.clear();
        assert!(hub.is_empty());
    }

    #[test]
    fn service_names_parse_from_wire_strings() {
        for name in ServiceName::ALL {
            assert_eq!(name.as_str().parse::<ServiceName>().unwrap(), name);
        }
        assert!("billing".parse::<ServiceName>().is_err());
    }
}
