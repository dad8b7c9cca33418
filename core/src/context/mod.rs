//! Startup context: configuration properties and conditional service registration.
//!
//! Everything in this module runs once, single-threaded, before the HTTP server
//! accepts its first request. The products ([`ConfigurationContext`] and
//! [`ServiceRegistry`]) are immutable and can be shared freely afterwards.
//!
//! # Module Structure
//!
//! - `properties` - layered configuration and typed property binding
//! - `condition` - activation predicates
//! - `registry` - the registration builder and the resolved registry
//! - `storage` - the storage service and its default auto-configuration
//! - `error` - fatal startup errors

pub use condition::Condition;
pub use error::{BoxError, StartupError};
pub use properties::{ConfigurationContext, ConfigurationContextBuilder, PropertyValue};
pub use registry::{
    ConditionOutcome, Origin, OutcomeStatus, RegistryBuilder, ServiceKey, ServiceRegistry,
};
#[cfg(feature = "storage")]
pub use storage::{
    LocalStorageService, StorageError, StorageService, StorageServiceProperties, STORAGE_SERVICE,
};

mod error;

pub mod condition;
pub mod properties;
pub mod registry;
#[cfg(feature = "storage")]
pub mod storage;
