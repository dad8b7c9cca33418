//! Principal lookup against a trust store.
//!
//! # Spring Security Equivalent
//! `UserDetailsService.loadUserByUsername(String)`
//!
//! # Example
//! ```rust,ignore
//! use actix_bootstrap_core::http::security::{LookupError, Principal, PrincipalLookupService};
//! use async_trait::async_trait;
//!
//! struct DirectoryLookup {
//!     pool: PgPool,
//! }
//!
//! #[async_trait]
//! impl PrincipalLookupService for DirectoryLookup {
//!     async fn lookup(&self, identifier: &str) -> Result<Option<Principal>, LookupError> {
//!         let row = sqlx::query!("SELECT * FROM principals WHERE id = $1", identifier)
//!             .fetch_optional(&self.pool)
//!             .await
//!             .map_err(|e| LookupError::Unavailable(e.to_string()))?;
//!         Ok(row.map(|r| Principal::new(r.id, r.secret).roles(r.roles)))
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::warn;

use crate::http::security::principal::Principal;

/// Failure to consult the trust store.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LookupError {
    #[display("trust store unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}

/// Resolves a principal by identifier.
///
/// A pure read: implementations must not mutate the store and must be safe to
/// call from many requests at once.
#[async_trait]
pub trait PrincipalLookupService: Send + Sync {
    /// Returns `Ok(None)` for an unknown identifier and `Err` only when the
    /// store itself cannot answer.
    async fn lookup(&self, identifier: &str) -> Result<Option<Principal>, LookupError>;
}

#[async_trait]
impl<T: PrincipalLookupService + ?Sized> PrincipalLookupService for Arc<T> {
    async fn lookup(&self, identifier: &str) -> Result<Option<Principal>, LookupError> {
        (**self).lookup(identifier).await
    }
}

/// In-memory trust store, frozen once it is handed to a provider.
///
/// # Spring Security Equivalent
/// `InMemoryUserDetailsManager`
///
/// Cloning is cheap and every clone shares the same map.
#[derive(Clone, Default)]
pub struct InMemoryPrincipalStore {
    principals: Arc<HashMap<String, Principal>>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a principal. A second principal with the same identifier is ignored.
    pub fn with_principal(mut self, principal: Principal) -> Self {
        use std::collections::hash_map::Entry;

        let principals = Arc::make_mut(&mut self.principals);
        match principals.entry(principal.get_identifier().to_string()) {
            Entry::Occupied(e) => {
                warn!(identifier = %e.key(), "principal already registered, skipping");
            }
            Entry::Vacant(e) => {
                e.insert(principal);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

#[async_trait]
impl PrincipalLookupService for InMemoryPrincipalStore {
    async fn lookup(&self, identifier: &str) -> Result<Option<Principal>, LookupError> {
        Ok(self.principals.get(identifier).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_lookup_known_and_unknown() {
        let store = InMemoryPrincipalStore::new()
            .with_principal(Principal::new("u1", "s1").roles(["USER"]));

        let found = store.lookup("u1").await.unwrap().unwrap();
        assert!(found.has_role("USER"));
        assert!(store.lookup("u2").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_duplicate_identifier_keeps_first() {
        let store = InMemoryPrincipalStore::new()
            .with_principal(Principal::new("u1", "first"))
            .with_principal(Principal::new("u1", "second"));

        assert_eq!(store.len(), 1);
        let found = store.lookup("u1").await.unwrap().unwrap();
        assert_eq!(found.get_secret(), "first");
    }

    #[actix_web::test]
    async fn test_clones_share_the_store() {
        let store = InMemoryPrincipalStore::new().with_principal(Principal::new("u1", "s1"));
        let shared: Arc<dyn PrincipalLookupService> = Arc::new(store.clone());

        assert!(shared.lookup("u1").await.unwrap().is_some());
    }
}
