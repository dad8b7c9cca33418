//! Authentication pipeline.
//!
//! # Spring Equivalent
//! `org.springframework.security` package
//!
//! # Module Structure
//!
//! - `config` - Core traits (AuthenticationProvider, FailureHandler) and outcomes
//! - `principal` - Principal model
//! - `lookup` - Principal lookup against a trust store (InMemoryPrincipalStore)
//! - `token` - Signed bearer token provider and issuer
//! - `http_basic` - Password-based provider for HTTP Basic credentials
//! - `crypto` - Password encoding (Argon2, NoOp)
//! - `ant_matcher` - Ant-style URL pattern matching
//! - `access_policy` - Ordered Open / RequiresAuth path rules
//! - `pipeline` - Per-request state machine
//! - `failure` - Default JSON failure handler
//! - `audit` - Security audit events
//! - `middleware` - Security middleware (SecurityTransform)
//! - `extractor` - Actix Web extractors (AuthenticatedPrincipal, OptionalPrincipal)
//! - `properties` - The `security.*` configuration group
//!
//! # Feature Flags
//! - `token`: Enables `TokenAuthenticationProvider` and `TokenIssuer`
//! - `http-basic`: Enables `BasicAuthenticationProvider` and `Argon2PasswordEncoder`

pub use access_policy::{AccessPolicy, AccessPolicyBuilder, PathRule, Requirement};
pub use ant_matcher::AntMatcher;
pub use audit::{
    AuditLogger, InMemoryEventStore, SecurityEvent, SecurityEventHandler, SecurityEventSeverity,
    SecurityEventType, TracingHandler,
};
pub use config::{AuthenticationOutcome, AuthenticationProvider, FailureHandler, RejectReason};
#[cfg(feature = "http-basic")]
pub use crypto::Argon2PasswordEncoder;
pub use crypto::{EncodingError, NoOpPasswordEncoder, PasswordEncoder};
pub use extractor::{AuthenticatedPrincipal, OptionalPrincipal, SecurityExt};
pub use failure::JsonFailureHandler;
#[cfg(feature = "http-basic")]
pub use http_basic::BasicAuthenticationProvider;
pub use lookup::{InMemoryPrincipalStore, LookupError, PrincipalLookupService};
pub use middleware::{
    CredentialExtractor, HeaderCredentialExtractor, SecurityService, SecurityTransform,
};
pub use pipeline::{AuthenticationPipeline, PipelineState};
pub use principal::Principal;
pub use properties::{SecurityProperties, TokenProperties};
#[cfg(feature = "token")]
pub use token::{Claims, TokenAuthenticationProvider, TokenConfig, TokenError, TokenIssuer};

// Internal modules (private implementation details)
mod config;
mod extractor;
mod principal;

// Public modules
pub mod access_policy;
pub mod ant_matcher;
pub mod audit;
pub mod crypto;
pub mod failure;
#[cfg(feature = "http-basic")]
pub mod http_basic;
pub mod lookup;
pub mod middleware;
pub mod pipeline;
pub mod properties;
#[cfg(feature = "token")]
pub mod token;
