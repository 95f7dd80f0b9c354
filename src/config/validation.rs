//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, method tokens and timeouts
//! - Check every route pattern and handler before any tree is built
//! - Check the not-found and method-not-allowed chains like route chains
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Conflicts between routes are left to registration, which sees the tree

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use thiserror::Error;

use crate::config::schema::{RouteConfig, RouterConfig};
use crate::http::handler::Action;
use crate::routing::path::join_paths;
use crate::routing::pattern;
use crate::routing::router::is_method_token;
use crate::routing::PatternError;

/// A single semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    Timeout,

    #[error("allowed method `{0}` is not an uppercase token")]
    MethodToken(String),

    #[error("route `{route}` lists no methods")]
    NoMethods { route: String },

    #[error("route `{route}` uses method `{method}` which is not allowed")]
    MethodNotAllowed { route: String, method: String },

    #[error("route `{route}` has no handlers")]
    NoHandlers { route: String },

    #[error("route `{route}` has a malformed pattern: {source}")]
    Pattern {
        route: String,
        #[source]
        source: PatternError,
    },

    #[error("route `{route}` sets invalid header `{name}`")]
    Header { route: String, name: String },

    #[error("route `{route}` sets invalid status code {code}")]
    Status { route: String, code: u16 },
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Timeout);
    }

    let allowed = &config.router.allowed_methods;
    for method in allowed {
        if !is_method_token(method) {
            errors.push(ValidationError::MethodToken(method.clone()));
        }
    }

    for route in &config.routes {
        validate_route(route, &route.path, &[], allowed, &mut errors);
    }
    for group in &config.groups {
        for route in &group.routes {
            let full = join_paths(&group.prefix, &route.path);
            validate_route(route, &full, &group.handlers, allowed, &mut errors);
        }
    }
    validate_actions("not_found", &config.router.not_found, &mut errors);
    validate_actions("method_not_allowed", &config.router.method_not_allowed, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(
    route: &RouteConfig,
    full_path: &str,
    inherited: &[Action],
    allowed: &[String],
    errors: &mut Vec<ValidationError>,
) {
    let label = route.label().to_string();

    if route.methods.is_empty() {
        errors.push(ValidationError::NoMethods { route: label.clone() });
    }
    for method in &route.methods {
        if !allowed.contains(method) {
            errors.push(ValidationError::MethodNotAllowed {
                route: label.clone(),
                method: method.clone(),
            });
        }
    }
    if route.handlers.is_empty() && inherited.is_empty() {
        errors.push(ValidationError::NoHandlers { route: label.clone() });
    }
    if let Err(source) = pattern::parse(full_path) {
        errors.push(ValidationError::Pattern {
            route: label.clone(),
            source,
        });
    }

    validate_actions(&label, inherited, errors);
    validate_actions(&label, &route.handlers, errors);
}

/// Check header and status actions; `label` names the chain in errors.
fn validate_actions(label: &str, actions: &[Action], errors: &mut Vec<ValidationError>) {
    for action in actions {
        match action {
            Action::Header { name, value } => {
                if HeaderName::try_from(name.as_str()).is_err()
                    || HeaderValue::try_from(value.as_str()).is_err()
                {
                    errors.push(ValidationError::Header {
                        route: label.to_string(),
                        name: name.clone(),
                    });
                }
            }
            Action::Status { code } => {
                if StatusCode::from_u16(*code).is_err() {
                    errors.push(ValidationError::Status {
                        route: label.to_string(),
                        code: *code,
                    });
                }
            }
            Action::Text { .. } | Action::Json { .. } | Action::Params => {}
        }
    }
}
