use derive_more::{Display, Error};

/// Error type produced by registration factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal errors raised while the application context is being built.
///
/// Any of these aborts process startup; nothing at request time produces one.
#[derive(Debug, Display, Error)]
pub enum StartupError {
    #[display("failed to load configuration: {source}")]
    Configuration { source: config::ConfigError },
    #[display("failed to bind properties under `{prefix}`: {source}")]
    Binding {
        prefix: String,
        source: config::ConfigError,
    },
    #[display("factory for service `{id}` failed: {cause}")]
    Factory { id: &'static str, cause: BoxError },
}
