//! Typed property groups of the demo application.
//!
//! # Spring Equivalent
//! `@ConfigurationProperties(prefix = "mail")` / `@ConfigurationProperties(prefix = "user")`

use serde::{Deserialize, Serialize};

use actix_bootstrap_core::context::{ConfigurationContext, StartupError};
use actix_bootstrap_core::http::security::SecurityProperties;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailProperties {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub from: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProperties {
    pub name: String,
    pub age: u32,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerProperties {
    pub host: String,
    pub port: u16,
}

impl Default for ServerProperties {
    fn default() -> Self {
        ServerProperties {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Every group, bound once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ApplicationProperties {
    pub mail: MailProperties,
    pub user: UserProperties,
    pub server: ServerProperties,
    pub security: SecurityProperties,
}

impl ApplicationProperties {
    /// Binds every group; absent groups take their defaults.
    pub fn bind(config: &ConfigurationContext) -> Result<Self, StartupError> {
        Ok(ApplicationProperties {
            mail: config.bind_or_default("mail")?,
            user: config.bind_or_default("user")?,
            server: config.bind_or_default("server")?,
            security: config.bind_or_default("security")?,
        })
    }
}
