//! Activation conditions for conditional service registration.
//!
//! # Spring Equivalent
//! `@ConditionalOnClass`, `@ConditionalOnMissingBean`, `@ConditionalOnProperty`

use std::collections::HashSet;
use std::fmt;

use crate::context::ConfigurationContext;

/// A startup-time predicate over process state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The named type was compiled into this build (declared in the class catalog).
    ClassPresent(String),
    /// No service has been bound under the named id yet.
    BeanAbsent(String),
    /// The configuration value at `key` renders equal to `expected`.
    /// An absent key never matches.
    PropertyEquals { key: String, expected: String },
}

impl Condition {
    pub fn class_present(name: impl Into<String>) -> Self {
        Condition::ClassPresent(name.into())
    }

    pub fn bean_absent(id: impl Into<String>) -> Self {
        Condition::BeanAbsent(id.into())
    }

    pub fn property_equals(key: impl Into<String>, expected: impl Into<String>) -> Self {
        Condition::PropertyEquals {
            key: key.into(),
            expected: expected.into(),
        }
    }

    /// Evaluates the condition against the current build state.
    pub fn matches(&self, state: &EvaluationState<'_>) -> bool {
        match self {
            Condition::ClassPresent(name) => state.classes.contains(name.as_str()),
            Condition::BeanAbsent(id) => !state.bound.contains(id.as_str()),
            Condition::PropertyEquals { key, expected } => state
                .config
                .get(key)
                .is_some_and(|value| value.matches(expected)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::ClassPresent(name) => write!(f, "@ConditionalOnClass({})", name),
            Condition::BeanAbsent(id) => write!(f, "@ConditionalOnMissingBean({})", id),
            Condition::PropertyEquals { key, expected } => {
                write!(f, "@ConditionalOnProperty({}={})", key, expected)
            }
        }
    }
}

/// Snapshot of process state that conditions are evaluated against.
///
/// `bound` grows as registrations commit, so a `BeanAbsent` condition sees
/// every registration evaluated before it.
pub struct EvaluationState<'a> {
    pub(crate) config: &'a ConfigurationContext,
    pub(crate) classes: &'a HashSet<&'static str>,
    pub(crate) bound: &'a HashSet<&'static str>,
}

/// Returns the first condition that does not hold, short-circuiting in
/// declaration order. `None` means every condition holds.
pub(crate) fn first_failing<'c>(
    conditions: &'c [Condition],
    state: &EvaluationState<'_>,
) -> Option<&'c Condition> {
    conditions.iter().find(|condition| !condition.matches(state))
}
