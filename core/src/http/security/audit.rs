//! Security audit events.
//!
//! # Spring Security Equivalent
//! `AuthenticationEventPublisher` with `AuthenticationSuccessEvent` /
//! `AbstractAuthenticationFailureEvent`
//!
//! # Example
//!
//! ```ignore
//! use actix_bootstrap_core::http::security::audit::{AuditLogger, InMemoryEventStore};
//!
//! let store = InMemoryEventStore::new();
//! let audit = AuditLogger::with_tracing().add_handler(store.clone());
//!
//! // hand `audit` to the pipeline / failure handler, then later:
//! let failures = store.events();
//! ```

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::http::security::config::RejectReason;

/// Kind of security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEventType {
    AuthenticationSuccess,
    /// The credential was missing or did not verify.
    AuthenticationFailure,
    /// The request was denied because infrastructure failed.
    OperationalFault,
}

impl fmt::Display for SecurityEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityEventType::AuthenticationSuccess => write!(f, "AUTHENTICATION_SUCCESS"),
            SecurityEventType::AuthenticationFailure => write!(f, "AUTHENTICATION_FAILURE"),
            SecurityEventType::OperationalFault => write!(f, "OPERATIONAL_FAULT"),
        }
    }
}

impl SecurityEventType {
    pub fn default_severity(&self) -> SecurityEventSeverity {
        match self {
            SecurityEventType::AuthenticationSuccess => SecurityEventSeverity::Info,
            SecurityEventType::AuthenticationFailure => SecurityEventSeverity::Warning,
            SecurityEventType::OperationalFault => SecurityEventSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecurityEventSeverity {
    #[default]
    Info,
    Warning,
    Error,
}

impl fmt::Display for SecurityEventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityEventSeverity::Info => write!(f, "INFO"),
            SecurityEventSeverity::Warning => write!(f, "WARNING"),
            SecurityEventSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A security audit event.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityEvent {
    pub id: String,
    /// Unix epoch milliseconds
    pub timestamp: u64,
    pub event_type: SecurityEventType,
    pub severity: SecurityEventSeverity,
    pub principal: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub ip_address: Option<String>,
    /// Stable reject code, see [`RejectReason::code`]
    pub reason: Option<&'static str>,
}

impl SecurityEvent {
    pub fn new(event_type: SecurityEventType) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            id: generate_event_id(),
            timestamp: now,
            severity: event_type.default_severity(),
            event_type,
            principal: None,
            path: None,
            method: None,
            ip_address: None,
            reason: None,
        }
    }

    pub fn authentication_success(principal: &str, path: &str) -> Self {
        Self::new(SecurityEventType::AuthenticationSuccess)
            .principal(principal)
            .path(path)
    }

    /// A denial. Operational faults get their own type and severity.
    pub fn denied(reason: RejectReason, path: &str) -> Self {
        let event_type = if reason.is_operational_fault() {
            SecurityEventType::OperationalFault
        } else {
            SecurityEventType::AuthenticationFailure
        };

        let mut event = Self::new(event_type).path(path);
        event.reason = Some(reason.code());
        event
    }

    pub fn principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Format the event as a log line.
    pub fn to_log_line(&self) -> String {
        let mut parts = vec![
            format!("[{}]", self.severity),
            format!("[{}]", self.event_type),
        ];

        if let Some(ref principal) = self.principal {
            parts.push(format!("principal={}", principal));
        }
        if let Some(ref method) = self.method {
            parts.push(format!("method={}", method));
        }
        if let Some(ref path) = self.path {
            parts.push(format!("path={}", path));
        }
        if let Some(ref ip) = self.ip_address {
            parts.push(format!("ip={}", ip));
        }
        if let Some(reason) = self.reason {
            parts.push(format!("reason={}", reason));
        }

        parts.join(" ")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_log_line())
    }
}

fn generate_event_id() -> String {
    use rand::Rng;
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp, random)
}

/// Receives security events.
pub trait SecurityEventHandler: Send + Sync {
    fn handle(&self, event: &SecurityEvent);
}

/// Forwards events to `tracing` at a level matching their severity.
#[derive(Debug, Default)]
pub struct TracingHandler;

impl SecurityEventHandler for TracingHandler {
    fn handle(&self, event: &SecurityEvent) {
        let path = event.path.as_deref().unwrap_or("-");
        let reason = event.reason.unwrap_or("-");
        match event.severity {
            SecurityEventSeverity::Info => info!(
                target: "security.audit",
                event_id = %event.id,
                event_type = %event.event_type,
                principal = event.principal.as_deref().unwrap_or("-"),
                path,
                "authentication succeeded"
            ),
            SecurityEventSeverity::Warning => warn!(
                target: "security.audit",
                event_id = %event.id,
                event_type = %event.event_type,
                path,
                reason,
                "authentication denied"
            ),
            SecurityEventSeverity::Error => error!(
                target: "security.audit",
                event_id = %event.id,
                event_type = %event.event_type,
                path,
                reason,
                "authentication denied by operational fault"
            ),
        }
    }
}

pub struct ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    handler: F,
}

impl<F> ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> SecurityEventHandler for ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    fn handle(&self, event: &SecurityEvent) {
        (self.handler)(event);
    }
}

/// Bounded in-memory event store for tests and debugging.
///
/// Clones share the same buffer.
#[derive(Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<SecurityEvent>>>,
    max_events: usize,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: 10000,
        }
    }

    pub fn max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    pub fn events(&self) -> Vec<SecurityEvent> {
        match self.events.read() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn events_by_type(&self, event_type: SecurityEventType) -> Vec<SecurityEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    pub fn clear(&self) {
        match self.events.write() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl SecurityEventHandler for InMemoryEventStore {
    fn handle(&self, event: &SecurityEvent) {
        let mut guard = match self.events.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(event.clone());
        if guard.len() > self.max_events {
            guard.remove(0);
        }
    }
}

/// Dispatches events to every registered handler.
#[derive(Clone)]
pub struct AuditLogger {
    handlers: Arc<Vec<Arc<dyn SecurityEventHandler>>>,
    enabled: bool,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::with_tracing()
    }
}

impl AuditLogger {
    /// A logger with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
            enabled: true,
        }
    }

    pub fn with_tracing() -> Self {
        Self::new().add_handler(TracingHandler)
    }

    pub fn add_handler<H: SecurityEventHandler + 'static>(mut self, handler: H) -> Self {
        let handlers = Arc::make_mut(&mut self.handlers);
        handlers.push(Arc::new(handler));
        self
    }

    pub fn with_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&SecurityEvent) + Send + Sync + 'static,
    {
        self.add_handler(ClosureHandler::new(handler))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn log(&self, event: SecurityEvent) {
        if !self.enabled {
            return;
        }

        for handler in self.handlers.iter() {
            handler.handle(&event);
        }
    }
}
