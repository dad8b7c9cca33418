//! Conditional service registration.
//!
//! # Spring Equivalent
//! `@Configuration` + `@Bean` + `@Conditional*` auto-configuration
//!
//! Registrations are declared on a [`RegistryBuilder`] and evaluated exactly
//! once by [`RegistryBuilder::build`], which produces an immutable
//! [`ServiceRegistry`].
//!
//! # Evaluation Order
//!
//! 1. Every user registration, in declaration order.
//! 2. Every default registration, in declaration order.
//!
//! The first registration whose conditions all hold binds its id; later
//! registrations for that id are superseded and their factories never run.
//! Because defaults always come last, a user-supplied service always wins over
//! a default one, wherever the two are declared in source.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use actix_bootstrap_core::context::{
//!     Condition, ConfigurationContext, RegistryBuilder, ServiceKey,
//! };
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! const GREETER: ServiceKey<dyn Greeter> = ServiceKey::new("greeter");
//!
//! let config = ConfigurationContext::builder().set("greeter.enabled", true).build().unwrap();
//! let registry = RegistryBuilder::new()
//!     .register_default(
//!         GREETER,
//!         [Condition::bean_absent("greeter"), Condition::property_equals("greeter.enabled", "true")],
//!         |_| Ok(Arc::new(English) as Arc<dyn Greeter>),
//!     )
//!     .build(&config)
//!     .unwrap();
//!
//! assert_eq!(registry.resolve(GREETER).unwrap().greet(), "hello");
//! ```

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::context::condition::{first_failing, EvaluationState};
use crate::context::{BoxError, Condition, ConfigurationContext, StartupError};

type Instance = Box<dyn Any + Send + Sync>;
type Factory = Box<dyn FnOnce(&ConfigurationContext) -> Result<Instance, BoxError>>;

/// Typed identity of an abstract service.
///
/// The id string is what `BeanAbsent` conditions refer to.
pub struct ServiceKey<T: ?Sized> {
    id: &'static str,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> ServiceKey<T> {
    pub const fn new(id: &'static str) -> Self {
        ServiceKey {
            id,
            _marker: PhantomData,
        }
    }

    pub const fn id(&self) -> &'static str {
        self.id
    }
}

impl<T: ?Sized> Clone for ServiceKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ServiceKey<T> {}

impl<T: ?Sized> fmt::Debug for ServiceKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceKey").field(&self.id).finish()
    }
}

/// Where a registration was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Default,
}

/// Result of evaluating one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// All conditions held; the factory ran and its instance is bound.
    Matched,
    /// The given condition was the first one that did not hold.
    NotMatched(Condition),
    /// Another registration already bound this id.
    Superseded,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Matched => f.write_str("matched"),
            OutcomeStatus::NotMatched(condition) => write!(f, "did not match {}", condition),
            OutcomeStatus::Superseded => f.write_str("superseded"),
        }
    }
}

/// One line of the condition report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionOutcome {
    pub id: &'static str,
    pub origin: Origin,
    pub status: OutcomeStatus,
}

struct Registration {
    id: &'static str,
    origin: Origin,
    conditions: Vec<Condition>,
    factory: Factory,
}

/// Collects registrations and the class catalog before startup evaluation.
#[derive(Default)]
pub struct RegistryBuilder {
    classes: HashSet<&'static str>,
    user: Vec<Registration>,
    defaults: Vec<Registration>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a type as present in this build, satisfying `ClassPresent(name)`.
    pub fn with_class(mut self, name: &'static str) -> Self {
        self.classes.insert(name);
        self
    }

    /// Declares a user registration.
    pub fn register<T, F>(
        self,
        key: ServiceKey<T>,
        conditions: impl IntoIterator<Item = Condition>,
        factory: F,
    ) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: FnOnce(&ConfigurationContext) -> Result<Arc<T>, BoxError> + 'static,
    {
        self.push(Origin::User, key, conditions, factory)
    }

    /// Declares an unconditional user registration for an existing instance.
    pub fn register_instance<T>(self, key: ServiceKey<T>, instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.push(Origin::User, key, [], move |_| Ok(instance))
    }

    /// Declares a default registration, evaluated after every user registration.
    pub fn register_default<T, F>(
        self,
        key: ServiceKey<T>,
        conditions: impl IntoIterator<Item = Condition>,
        factory: F,
    ) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: FnOnce(&ConfigurationContext) -> Result<Arc<T>, BoxError> + 'static,
    {
        self.push(Origin::Default, key, conditions, factory)
    }

    fn push<T, F>(
        mut self,
        origin: Origin,
        key: ServiceKey<T>,
        conditions: impl IntoIterator<Item = Condition>,
        factory: F,
    ) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: FnOnce(&ConfigurationContext) -> Result<Arc<T>, BoxError> + 'static,
    {
        let registration = Registration {
            id: key.id(),
            origin,
            conditions: conditions.into_iter().collect(),
            factory: Box::new(move |config| {
                factory(config).map(|service| Box::new(service) as Instance)
            }),
        };
        match origin {
            Origin::User => self.user.push(registration),
            Origin::Default => self.defaults.push(registration),
        }
        self
    }

    /// Evaluates every registration and freezes the result.
    ///
    /// # Errors
    /// Returns [`StartupError::Factory`] as soon as a matched factory fails;
    /// the remaining registrations are not evaluated.
    pub fn build(self, config: &ConfigurationContext) -> Result<ServiceRegistry, StartupError> {
        let RegistryBuilder {
            classes,
            user,
            defaults,
        } = self;

        let mut services: HashMap<&'static str, Instance> = HashMap::new();
        let mut bound: HashSet<&'static str> = HashSet::new();
        let mut report = Vec::with_capacity(user.len() + defaults.len());

        for registration in user.into_iter().chain(defaults) {
            let Registration {
                id,
                origin,
                conditions,
                factory,
            } = registration;

            let status = if bound.contains(id) {
                OutcomeStatus::Superseded
            } else {
                let state = EvaluationState {
                    config,
                    classes: &classes,
                    bound: &bound,
                };
                match first_failing(&conditions, &state) {
                    Some(condition) => OutcomeStatus::NotMatched(condition.clone()),
                    None => {
                        let instance = factory(config).map_err(|cause| {
                            error!(service = id, error = %cause, "service factory failed");
                            StartupError::Factory { id, cause }
                        })?;
                        services.insert(id, instance);
                        bound.insert(id);
                        OutcomeStatus::Matched
                    }
                }
            };

            debug!(service = id, origin = ?origin, %status, "registration evaluated");
            report.push(ConditionOutcome { id, origin, status });
        }

        info!(services = services.len(), "service registry built");
        Ok(ServiceRegistry { services, report })
    }
}

/// Immutable mapping from service id to its single active instance.
pub struct ServiceRegistry {
    services: HashMap<&'static str, Instance>,
    report: Vec<ConditionOutcome>,
}

impl ServiceRegistry {
    /// Returns the active instance for `key`, or `None` when no registration
    /// matched. Absence is a normal state for optional services.
    pub fn resolve<T>(&self, key: ServiceKey<T>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance: &(dyn Any + Send + Sync) = &**self.services.get(key.id())?;
        let resolved = instance.downcast_ref::<Arc<T>>().cloned();
        if resolved.is_none() {
            warn!(
                service = key.id(),
                requested = std::any::type_name::<T>(),
                "service is bound under a different type"
            );
        }
        resolved
    }

    pub fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Every registration outcome, in evaluation order.
    pub fn report(&self) -> &[ConditionOutcome] {
        &self.report
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .field("report", &self.report)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter: Send + Sync {
        fn greet(&self) -> &'static str;
    }

    struct Custom;
    impl Greeter for Custom {
        fn greet(&self) -> &'static str {
            "custom"
        }
    }

    struct Fallback;
    impl Greeter for Fallback {
        fn greet(&self) -> &'static str {
            "fallback"
        }
    }

    const GREETER: ServiceKey<dyn Greeter> = ServiceKey::new("greeter");

    fn counting<G: Greeter + 'static>(
        counter: &Arc<AtomicUsize>,
        greeter: G,
    ) -> impl FnOnce(&ConfigurationContext) -> Result<Arc<dyn Greeter>, BoxError> + 'static {
        let counter = Arc::clone(counter);
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(greeter) as Arc<dyn Greeter>)
        }
    }

    fn default_conditions() -> Vec<Condition> {
        vec![
            Condition::class_present("Greeter"),
            Condition::bean_absent("greeter"),
            Condition::property_equals("enabled", "true"),
        ]
    }

    #[test]
    fn test_registry_is_write_once_per_id() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let registry = RegistryBuilder::new()
            .register(GREETER, [], counting(&first, Custom))
            .register(GREETER, [], counting(&second, Fallback))
            .build(&ConfigurationContext::empty())
            .unwrap();

        assert_eq!(registry.resolve(GREETER).unwrap().greet(), "custom");
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.report()[1].status, OutcomeStatus::Superseded);
    }

    #[test]
    fn test_user_registration_wins_over_default_declared_first() {
        let defaults = Arc::new(AtomicUsize::new(0));
        let config = ConfigurationContext::builder()
            .set("enabled", true)
            .build()
            .unwrap();

        let registry = RegistryBuilder::new()
            .with_class("Greeter")
            .register_default(GREETER, default_conditions(), counting(&defaults, Fallback))
            .register_instance(GREETER, Arc::new(Custom) as Arc<dyn Greeter>)
            .build(&config)
            .unwrap();

        assert_eq!(registry.resolve(GREETER).unwrap().greet(), "custom");
        assert_eq!(defaults.load(Ordering::SeqCst), 0);

        let report = registry.report();
        assert_eq!(report[0].origin, Origin::User);
        assert_eq!(report[1].origin, Origin::Default);
        assert_eq!(report[1].status, OutcomeStatus::Superseded);
    }

    #[test]
    fn test_default_activates_when_absent_and_enabled() {
        let config = ConfigurationContext::builder()
            .set("enabled", "true")
            .build()
            .unwrap();

        let registry = RegistryBuilder::new()
            .with_class("Greeter")
            .register_default(GREETER, default_conditions(), |_| {
                Ok(Arc::new(Fallback) as Arc<dyn Greeter>)
            })
            .build(&config)
            .unwrap();

        assert_eq!(registry.resolve(GREETER).unwrap().greet(), "fallback");
    }

    #[test]
    fn test_disabled_property_resolves_to_none() {
        let config = ConfigurationContext::builder()
            .set("enabled", false)
            .build()
            .unwrap();

        let registry = RegistryBuilder::new()
            .with_class("Greeter")
            .register_default(GREETER, default_conditions(), |_| {
                Ok(Arc::new(Fallback) as Arc<dyn Greeter>)
            })
            .build(&config)
            .unwrap();

        assert!(registry.resolve(GREETER).is_none());
        assert_eq!(
            registry.report()[0].status,
            OutcomeStatus::NotMatched(Condition::property_equals("enabled", "true"))
        );
    }

    #[test]
    fn test_absent_property_key_resolves_to_none() {
        let registry = RegistryBuilder::new()
            .register_default(
                GREETER,
                [Condition::property_equals("storage.service.enabled", "true")],
                |_| Ok(Arc::new(Fallback) as Arc<dyn Greeter>),
            )
            .build(&ConfigurationContext::empty())
            .unwrap();

        assert!(registry.resolve(GREETER).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_class_resolves_to_none() {
        let config = ConfigurationContext::builder()
            .set("enabled", true)
            .build()
            .unwrap();

        let registry = RegistryBuilder::new()
            .register_default(GREETER, default_conditions(), |_| {
                Ok(Arc::new(Fallback) as Arc<dyn Greeter>)
            })
            .build(&config)
            .unwrap();

        assert!(registry.resolve(GREETER).is_none());
    }

    #[test]
    fn test_bean_absent_sees_earlier_commits() {
        const AUDIT: ServiceKey<dyn Greeter> = ServiceKey::new("audit");

        let registry = RegistryBuilder::new()
            .register(GREETER, [], |_| Ok(Arc::new(Custom) as Arc<dyn Greeter>))
            .register_default(AUDIT, [Condition::bean_absent("greeter")], |_| {
                Ok(Arc::new(Fallback) as Arc<dyn Greeter>)
            })
            .build(&ConfigurationContext::empty())
            .unwrap();

        assert!(registry.contains("greeter"));
        assert!(!registry.contains("audit"));
    }

    #[test]
    fn test_factory_failure_aborts_build() {
        let later = Arc::new(AtomicUsize::new(0));

        let result = RegistryBuilder::new()
            .register(GREETER, [], |_| Err::<Arc<dyn Greeter>, _>("disk unavailable".into()))
            .register_default(
                ServiceKey::<dyn Greeter>::new("other"),
                [],
                counting(&later, Fallback),
            )
            .build(&ConfigurationContext::empty());

        match result {
            Err(StartupError::Factory { id, cause }) => {
                assert_eq!(id, "greeter");
                assert_eq!(cause.to_string(), "disk unavailable");
            }
            other => panic!("expected factory error, got {:?}", other),
        }
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_resolve_with_wrong_type_is_none() {
        let registry = RegistryBuilder::new()
            .register(GREETER, [], |_| Ok(Arc::new(Custom) as Arc<dyn Greeter>))
            .build(&ConfigurationContext::empty())
            .unwrap();

        let wrong: ServiceKey<String> = ServiceKey::new("greeter");
        assert!(registry.resolve(wrong).is_none());
    }
}
