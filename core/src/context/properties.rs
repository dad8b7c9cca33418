//! Layered configuration properties.
//!
//! # Spring Equivalent
//! `Environment` + `@ConfigurationProperties`
//!
//! Properties are read from a TOML file and overlaid with environment variables
//! prefixed with `APP__` (`APP__STORAGE__SERVICE__ENABLED=true` maps to
//! `storage.service.enabled`). Underscores inside a segment map to dashes, so
//! `APP__SECURITY__TOKEN__TTL_SECS` overrides `security.token.ttl-secs`.
//! The result is loaded once and never mutated.
//!
//! # Example
//! ```
//! use actix_bootstrap_core::context::ConfigurationContext;
//!
//! let config = ConfigurationContext::builder()
//!     .toml("[storage.service]\nenabled = true")
//!     .build()
//!     .unwrap();
//!
//! assert!(config.get("storage.service.enabled").unwrap().matches("true"));
//! assert!(config.get("storage.service.location").is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use config::{Config, Environment, File, FileFormat, Map, Source, Value, ValueKind};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::context::StartupError;

/// Prefix of environment variables overriding file properties.
pub const ENV_PREFIX: &str = "APP";

/// A scalar configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Bool(bool),
    Number(f64),
}

impl PropertyValue {
    /// Compares the rendered value against `expected`, ignoring ASCII case.
    ///
    /// A boolean `true` and the strings `"true"` / `"TRUE"` all match `"true"`.
    pub fn matches(&self, expected: &str) -> bool {
        self.to_string().eq_ignore_ascii_case(expected)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::String(s) => s.parse().ok(),
            PropertyValue::Number(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Process-wide, read-only configuration.
///
/// Holds the layered source (for typed binding) and a flattened dotted-key
/// view of every scalar (for condition evaluation). Arrays flatten with an
/// index suffix: `security.permit-all.0`.
#[derive(Debug, Clone)]
pub struct ConfigurationContext {
    source: Config,
    properties: BTreeMap<String, PropertyValue>,
}

impl ConfigurationContext {
    /// Loads `path` (optional, TOML) and overlays `APP__*` environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StartupError> {
        let path = path.as_ref();
        let source = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(environment(std::env::vars()))
            .build()
            .map_err(|source| StartupError::Configuration { source })?;

        let context = Self::from_config(source)?;
        info!(
            path = %path.display(),
            properties = context.properties.len(),
            "configuration loaded"
        );
        Ok(context)
    }

    /// Creates a builder for in-process configuration (tests, embedded use).
    pub fn builder() -> ConfigurationContextBuilder {
        ConfigurationContextBuilder::default()
    }

    /// An empty configuration.
    pub fn empty() -> Self {
        ConfigurationContext {
            source: Config::default(),
            properties: BTreeMap::new(),
        }
    }

    fn from_config(source: Config) -> Result<Self, StartupError> {
        let root = source
            .collect()
            .map_err(|source| StartupError::Configuration { source })?;

        let mut properties = BTreeMap::new();
        for (key, value) in root {
            flatten(key, value, &mut properties);
        }

        Ok(ConfigurationContext { source, properties })
    }

    /// Returns the scalar at a dotted key, if present.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Returns true if any property lives under `prefix`.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.properties
            .keys()
            .any(|key| key == prefix || key.starts_with(&format!("{}.", prefix)))
    }

    /// Iterates over the flattened properties in key order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Binds the group under `prefix` into a typed properties struct.
    ///
    /// # Errors
    /// Returns [`StartupError::Binding`] when the group is missing or a value
    /// cannot be converted to the target type.
    pub fn bind<T: DeserializeOwned>(&self, prefix: &str) -> Result<T, StartupError> {
        self.source
            .get::<T>(prefix)
            .map_err(|source| StartupError::Binding {
                prefix: prefix.to_string(),
                source,
            })
    }

    /// Like [`bind`](Self::bind), but falls back to `T::default()` when nothing
    /// is configured under `prefix`. Conversion failures are still errors.
    pub fn bind_or_default<T>(&self, prefix: &str) -> Result<T, StartupError>
    where
        T: DeserializeOwned + Default,
    {
        if self.contains_prefix(prefix) {
            self.bind(prefix)
        } else {
            Ok(T::default())
        }
    }
}

/// Environment source over the `APP__*` entries of `vars`, with segment
/// underscores rewritten to dashes to match the kebab-case file keys.
fn environment(vars: impl IntoIterator<Item = (String, String)>) -> Environment {
    let prefix = format!("{}__", ENV_PREFIX);
    let source: Map<String, String> = vars
        .into_iter()
        .filter_map(|(key, value)| {
            let path = key.strip_prefix(&prefix)?;
            let path = path
                .split("__")
                .map(|segment| segment.to_lowercase().replace('_', "-"))
                .collect::<Vec<_>>()
                .join("__");
            Some((format!("{}{}", prefix, path), value))
        })
        .collect();

    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .source(Some(source))
}

fn flatten(key: String, value: Value, out: &mut BTreeMap<String, PropertyValue>) {
    let scalar = match value.kind {
        ValueKind::Nil => return,
        ValueKind::Boolean(b) => PropertyValue::Bool(b),
        ValueKind::I64(n) => PropertyValue::Number(n as f64),
        ValueKind::I128(n) => PropertyValue::Number(n as f64),
        ValueKind::U64(n) => PropertyValue::Number(n as f64),
        ValueKind::U128(n) => PropertyValue::Number(n as f64),
        ValueKind::Float(n) => PropertyValue::Number(n),
        ValueKind::String(s) => PropertyValue::String(s),
        ValueKind::Table(table) => {
            for (child, value) in table {
                flatten(format!("{}.{}", key, child), value, out);
            }
            return;
        }
        ValueKind::Array(items) => {
            for (index, value) in items.into_iter().enumerate() {
                flatten(format!("{}.{}", key, index), value, out);
            }
            return;
        }
    };
    out.insert(key, scalar);
}

/// Builder for [`ConfigurationContext`] without touching the filesystem or
/// the process environment.
#[derive(Default)]
pub struct ConfigurationContextBuilder {
    documents: Vec<String>,
    env: Vec<(String, String)>,
    overrides: Vec<(String, Value)>,
}

impl ConfigurationContextBuilder {
    /// Adds a TOML document. Later documents override earlier ones.
    pub fn toml(mut self, document: &str) -> Self {
        self.documents.push(document.to_string());
        self
    }

    /// Adds an environment variable, as if exported in the process.
    /// Only `APP__*` names are picked up.
    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.env.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets a single dotted key, overriding every document.
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.overrides.push((key.to_string(), value.into()));
        self
    }

    pub fn build(self) -> Result<ConfigurationContext, StartupError> {
        let mut builder = Config::builder();
        for document in &self.documents {
            builder = builder.add_source(File::from_str(document, FileFormat::Toml));
        }
        if !self.env.is_empty() {
            builder = builder.add_source(environment(self.env));
        }
        for (key, value) in self.overrides {
            builder = builder
                .set_override(key, value)
                .map_err(|source| StartupError::Configuration { source })?;
        }

        let source = builder
            .build()
            .map_err(|source| StartupError::Configuration { source })?;
        ConfigurationContext::from_config(source)
    }
}
