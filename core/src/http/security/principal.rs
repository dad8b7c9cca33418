//! Principal model.
//!
//! # Spring Equivalent
//! `UserDetails` / `Authentication.getPrincipal()`

use std::fmt;

use serde::Serialize;

/// An identity with its roles, authorities and trust material.
///
/// The trust material (`secret`) is the signing secret of a token principal or
/// the encoded password of a password principal. Providers erase it before the
/// principal is attached to a request.
///
/// # Example
/// ```
/// use actix_bootstrap_core::http::security::Principal;
///
/// let principal = Principal::new("u1", "signing-secret")
///     .roles(["ADMIN", "USER"])
///     .authorities(["users:read"]);
///
/// assert!(principal.has_role("ADMIN"));
/// assert!(principal.has_authority("users:read"));
/// assert!(principal.erase_credentials().get_secret().is_empty());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    identifier: String,
    #[serde(skip)]
    secret: String,
    roles: Vec<String>,
    authorities: Vec<String>,
}

impl Principal {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Principal {
            identifier: identifier.into(),
            secret: secret.into(),
            roles: Vec::new(),
            authorities: Vec::new(),
        }
    }

    pub fn get_identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the trust material. Empty once credentials are erased.
    pub fn get_secret(&self) -> &str {
        &self.secret
    }

    pub fn get_roles(&self) -> &[String] {
        &self.roles
    }

    pub fn get_authorities(&self) -> &[String] {
        &self.authorities
    }

    /// Adds roles, skipping duplicates.
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for role in roles {
            let role = role.into();
            if !self.roles.contains(&role) {
                self.roles.push(role);
            }
        }
        self
    }

    /// Adds authorities, skipping duplicates.
    pub fn authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for authority in authorities {
            let authority = authority.into();
            if !self.authorities.contains(&authority) {
                self.authorities.push(authority);
            }
        }
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        authorities.iter().any(|a| self.has_authority(a))
    }

    /// Drops the trust material.
    ///
    /// # Spring Equivalent
    /// `CredentialsContainer.eraseCredentials()`
    pub fn erase_credentials(mut self) -> Self {
        self.secret.clear();
        self
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("identifier", &self.identifier)
            .field("secret", &"[PROTECTED]")
            .field("roles", &self.roles)
            .field("authorities", &self.authorities)
            .finish()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Principal {{ identifier: {}, roles: {:?}, authorities: {:?} }}",
            self.identifier, self.roles, self.authorities
        )
    }
}
