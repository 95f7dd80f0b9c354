//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router
//! service. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::http::handler::Action;
use crate::routing::DEFAULT_METHODS;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route table settings.
    pub router: RoutingConfig,

    /// Routes registered at the top level, in file order.
    pub routes: Vec<RouteConfig>,

    /// Groups sharing a prefix and a handler chain.
    pub groups: Vec<GroupConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line layout.
    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Route table settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Methods routes may be registered under. Anything else is answered
    /// with 405.
    pub allowed_methods: Vec<String>,

    /// Chain run when no route matches the path. Empty means the built-in
    /// JSON 404 body.
    pub not_found: Vec<Action>,

    /// Chain run when the method is rejected. Empty means the built-in
    /// JSON 405 body.
    pub method_not_allowed: Vec<Action>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            allowed_methods: DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
            not_found: Vec::new(),
            method_not_allowed: Vec::new(),
        }
    }
}

/// One route: a pattern, the methods it answers, and its handler chain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Identifier for logs; defaults to the path.
    #[serde(default)]
    pub name: Option<String>,

    /// Methods to register the route under.
    pub methods: Vec<String>,

    /// Route pattern, relative to the group prefix when inside a group.
    pub path: String,

    /// Handler chain, run in order.
    pub handlers: Vec<Action>,
}

impl RouteConfig {
    /// Name used in logs and validation messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }
}

/// A set of routes sharing a prefix and leading handlers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GroupConfig {
    /// Base path joined in front of every route path.
    pub prefix: String,

    /// Handlers run before each route's own chain.
    #[serde(default)]
    pub handlers: Vec<Action>,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}
