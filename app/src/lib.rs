//! Demo application: conditional storage bootstrap behind a token-authenticated API.
//!
//! Startup runs once, in order:
//!
//! 1. load `application.toml` (or the path given as first argument) with
//!    `APP__*` environment overrides
//! 2. bind the typed property groups
//! 3. evaluate the registry, auto-configuring the storage service when
//!    `storage.service.enabled = true`
//!
//! Any failure is a [`StartupError`] and the process exits non-zero.

use actix_web::web;
use tracing::info;

use actix_bootstrap_core::context::{
    ConfigurationContext, RegistryBuilder, ServiceRegistry, StartupError,
};

pub mod handlers;
pub mod properties;
pub mod security;

use properties::ApplicationProperties;

/// The immutable products of startup.
#[derive(Debug, Clone)]
pub struct Application {
    pub properties: ApplicationProperties,
    pub registry: web::Data<ServiceRegistry>,
}

impl Application {
    /// Binds properties and evaluates the registry against `config`.
    pub fn bootstrap(config: &ConfigurationContext) -> Result<Self, StartupError> {
        Self::bootstrap_with(config, RegistryBuilder::new())
    }

    /// Like [`bootstrap`](Self::bootstrap), with caller-supplied registrations
    /// that take precedence over the defaults.
    pub fn bootstrap_with(
        config: &ConfigurationContext,
        registrations: RegistryBuilder,
    ) -> Result<Self, StartupError> {
        let properties = ApplicationProperties::bind(config)?;
        let registry = registrations.auto_configure_storage().build(config)?;

        for outcome in registry.report() {
            info!(service = outcome.id, origin = ?outcome.origin, status = %outcome.status, "condition report");
        }

        Ok(Application {
            properties,
            registry: web::Data::new(registry),
        })
    }

    /// Shared state and routes, for `App::configure`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.properties.mail.clone()))
            .app_data(web::Data::new(self.properties.user.clone()))
            .app_data(self.registry.clone());
        handlers::configure(cfg);
    }
}
