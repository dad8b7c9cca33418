//! Ordered path rules deciding which requests need authentication.
//!
//! # Spring Security Equivalent
//! `HttpSecurity.authorizeHttpRequests()` with `permitAll()` / `authenticated()`

use std::fmt;

use crate::http::security::ant_matcher::AntMatcher;
use crate::http::security::properties::SecurityProperties;

/// What a matched path requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Open,
    RequiresAuth,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Open => f.write_str("permitAll"),
            Requirement::RequiresAuth => f.write_str("authenticated"),
        }
    }
}

/// One `(pattern, requirement)` pair.
#[derive(Debug, Clone)]
pub struct PathRule {
    matcher: AntMatcher,
    requirement: Requirement,
}

impl PathRule {
    pub fn new(pattern: &str, requirement: Requirement) -> Self {
        PathRule {
            matcher: AntMatcher::new(pattern),
            requirement,
        }
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// Immutable, ordered rule list. The first matching rule wins and a path
/// matching no rule requires authentication.
///
/// # Example
/// ```
/// use actix_bootstrap_core::http::security::{AccessPolicy, Requirement};
///
/// let policy = AccessPolicy::builder()
///     .permit_all("/public/**")
///     .authenticated("/**")
///     .build();
///
/// assert_eq!(policy.classify("/public/doc"), Requirement::Open);
/// assert_eq!(policy.classify("/private/x"), Requirement::RequiresAuth);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<PathRule>,
}

impl AccessPolicy {
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// `permit_all` patterns in order, then a catch-all `RequiresAuth`.
    pub fn from_properties(properties: &SecurityProperties) -> Self {
        Self::builder()
            .permit_all_patterns(properties.permit_all.iter().map(String::as_str))
            .authenticated("/**")
            .build()
    }

    pub fn classify(&self, path: &str) -> Requirement {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(PathRule::requirement)
            .unwrap_or(Requirement::RequiresAuth)
    }

    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }
}

#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    rules: Vec<PathRule>,
}

impl AccessPolicyBuilder {
    pub fn permit_all(self, pattern: &str) -> Self {
        self.rule(PathRule::new(pattern, Requirement::Open))
    }

    pub fn permit_all_patterns<'a>(mut self, patterns: impl IntoIterator<Item = &'a str>) -> Self {
        for pattern in patterns {
            self = self.permit_all(pattern);
        }
        self
    }

    pub fn authenticated(self, pattern: &str) -> Self {
        self.rule(PathRule::new(pattern, Requirement::RequiresAuth))
    }

    pub fn rule(mut self, rule: PathRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> AccessPolicy {
        AccessPolicy { rules: self.rules }
    }
}
