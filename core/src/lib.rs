//! # Actix Bootstrap
//!
//! Application bootstrap for Actix Web services:
//!
//! - [`context`] - configuration properties and the conditional service registry,
//!   evaluated once at startup
//! - [`http::security`] - the per-request authentication pipeline, its
//!   pluggable provider and failure handler, and the middleware binding it to Actix
//!
//! ## Example
//!
//! ```rust,ignore
//! use actix_bootstrap_core::context::{ConfigurationContext, RegistryBuilder};
//! use actix_bootstrap_core::http::security::{
//!     AccessPolicy, AuthenticationPipeline, InMemoryPrincipalStore, JsonFailureHandler,
//!     SecurityTransform, TokenAuthenticationProvider,
//! };
//!
//! let config = ConfigurationContext::load("application.toml")?;
//! let registry = RegistryBuilder::new().auto_configure_storage().build(&config)?;
//!
//! let store = InMemoryPrincipalStore::new();
//! let pipeline = AuthenticationPipeline::new(TokenAuthenticationProvider::new(store))
//!     .access_policy(AccessPolicy::builder().permit_all("/public/**").authenticated("/**").build())
//!     .failure_handler(JsonFailureHandler::new());
//!
//! App::new().wrap(SecurityTransform::new(pipeline));
//! ```

pub mod context;
pub mod http;
