//! Storage service and its default auto-configuration.
//!
//! # Spring Equivalent
//! A `StorageAutoConfigure` class annotated with
//! `@ConditionalOnClass(StorageService.class)` whose `@Bean` method is guarded by
//! `@ConditionalOnMissingBean(StorageService.class)` and
//! `@ConditionalOnProperty(prefix = "storage.service", value = "enabled", havingValue = "true")`.
//!
//! # Feature Flag
//! Requires the `storage` feature (enabled by default). Compiling the feature in
//! is what makes `ClassPresent("StorageService")` hold.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::context::{Condition, RegistryBuilder, ServiceKey};

/// Class name declared by this module in the registry's class catalog.
pub const STORAGE_SERVICE_CLASS: &str = "StorageService";

/// Registry key of the active storage service.
pub const STORAGE_SERVICE: ServiceKey<dyn StorageService> = ServiceKey::new("storageService");

/// Properties bound from `storage.service`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageServiceProperties {
    /// Gates activation of the default storage service.
    pub enabled: bool,
    /// Root directory for stored objects.
    pub location: String,
}

impl Default for StorageServiceProperties {
    fn default() -> Self {
        StorageServiceProperties {
            enabled: false,
            location: "./storage".to_string(),
        }
    }
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum StorageError {
    #[display("object name is empty")]
    EmptyName,
    #[display("object name `{_0}` escapes the storage root")]
    OutsideRoot(#[error(not(source))] String),
}

/// Resolves where named objects live.
pub trait StorageService: Send + Sync {
    /// Root directory of this storage.
    fn location(&self) -> &Path;

    /// Resolves an object name to a path under [`location`](Self::location).
    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError>;
}

/// Filesystem-backed storage rooted at `storage.service.location`.
#[derive(Debug, Clone)]
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(properties: &StorageServiceProperties) -> Self {
        LocalStorageService {
            root: PathBuf::from(&properties.location),
        }
    }
}

impl StorageService for LocalStorageService {
    fn location(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(name.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return Err(StorageError::EmptyName);
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::OutsideRoot(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl RegistryBuilder {
    /// Adds the default storage registration.
    ///
    /// The default [`LocalStorageService`] is created only if no other
    /// registration bound `storageService` and `storage.service.enabled` is `true`.
    pub fn auto_configure_storage(self) -> Self {
        self.with_class(STORAGE_SERVICE_CLASS).register_default(
            STORAGE_SERVICE,
            [
                Condition::class_present(STORAGE_SERVICE_CLASS),
                Condition::bean_absent(STORAGE_SERVICE.id()),
                Condition::property_equals("storage.service.enabled", "true"),
            ],
            |config| {
                let properties: StorageServiceProperties = config.bind("storage.service")?;
                Ok(Arc::new(LocalStorageService::new(&properties)) as Arc<dyn StorageService>)
            },
        )
    }
}
