//! Method registry and dispatch.
//!
//! # Responsibilities
//! - Own one [`Tree`] per HTTP method, created on first registration
//! - Reject methods outside the configured allow-list
//! - Resolve `(method, path)` to a match or an explicit negative result
//! - Carry the chains run for those negative results
//!
//! # Design Decisions
//! - An explicit instance, built once and shared by reference; no global
//!   registry
//! - Immutable after construction; republish through
//!   [`SharedRouter`](crate::routing::SharedRouter) to change routes

use std::collections::BTreeMap;

use tracing::debug;

use crate::routing::error::{RegistrationError, RouteError};
use crate::routing::group::Group;
use crate::routing::tree::{Insertion, Match, Tree};

/// Methods accepted by [`Router::new`].
pub const DEFAULT_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Result of [`Router::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'r, 'p, H> {
    /// A pattern matched.
    Found(Match<'r, 'p, H>),
    /// The method has routes, but none matches the path.
    NotFound,
    /// The method is not allowed or has no routes at all.
    MethodNotAllowed,
}

impl<'r, 'p, H> Lookup<'r, 'p, H> {
    pub fn into_match(self) -> Option<Match<'r, 'p, H>> {
        match self {
            Lookup::Found(m) => Some(m),
            _ => None,
        }
    }
}

/// Per-method route trees.
#[derive(Debug, Clone)]
pub struct Router<H> {
    trees: BTreeMap<String, Tree<H>>,
    allowed: Vec<String>,
    not_found: Vec<H>,
    method_not_allowed: Vec<H>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    /// A router accepting [`DEFAULT_METHODS`].
    pub fn new() -> Self {
        Self {
            trees: BTreeMap::new(),
            allowed: DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
            not_found: Vec::new(),
            method_not_allowed: Vec::new(),
        }
    }

    /// A router accepting exactly `methods`, each an uppercase token.
    pub fn with_methods<I, S>(methods: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed: Vec<String> = Vec::new();
        for method in methods {
            let method = method.into();
            if !is_method_token(&method) {
                return Err(RouteError::UnsupportedMethod { method });
            }
            if !allowed.contains(&method) {
                allowed.push(method);
            }
        }
        Ok(Self {
            trees: BTreeMap::new(),
            allowed,
            not_found: Vec::new(),
            method_not_allowed: Vec::new(),
        })
    }

    pub fn allowed_methods(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_allowed(&self, method: &str) -> bool {
        self.allowed.iter().any(|m| m == method)
    }

    /// Register `handlers` for `method` and `pattern`.
    pub fn add_route(&mut self, method: &str, pattern: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        let wrap = |source| RegistrationError {
            method: method.to_string(),
            source,
        };
        if !self.is_allowed(method) {
            return Err(wrap(RouteError::UnsupportedMethod {
                method: method.to_string(),
            }));
        }

        // Validate against a fresh tree first so a bad first route does not
        // leave an empty tree behind for its method.
        let outcome = match self.trees.get_mut(method) {
            Some(tree) => tree.add_route(pattern, handlers).map_err(wrap)?,
            None => {
                let mut tree = Tree::new();
                let outcome = tree.add_route(pattern, handlers).map_err(wrap)?;
                self.trees.insert(method.to_string(), tree);
                outcome
            }
        };
        debug!(method, pattern, ?outcome, "Route registered");
        Ok(outcome)
    }

    pub fn get(&mut self, pattern: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.add_route("GET", pattern, handlers)
    }

    pub fn post(&mut self, pattern: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.add_route("POST", pattern, handlers)
    }

    pub fn put(&mut self, pattern: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.add_route("PUT", pattern, handlers)
    }

    pub fn delete(&mut self, pattern: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.add_route("DELETE", pattern, handlers)
    }

    pub fn patch(&mut self, pattern: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.add_route("PATCH", pattern, handlers)
    }

    pub fn head(&mut self, pattern: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.add_route("HEAD", pattern, handlers)
    }

    pub fn options(&mut self, pattern: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.add_route("OPTIONS", pattern, handlers)
    }

    /// Chain to run for [`Lookup::NotFound`]. Replaces any earlier chain.
    pub fn set_not_found(&mut self, handlers: Vec<H>) {
        self.not_found = handlers;
    }

    /// Chain to run for [`Lookup::MethodNotAllowed`]. Replaces any earlier
    /// chain.
    pub fn set_method_not_allowed(&mut self, handlers: Vec<H>) {
        self.method_not_allowed = handlers;
    }

    /// Empty unless set with [`Router::set_not_found`].
    pub fn not_found(&self) -> &[H] {
        &self.not_found
    }

    pub fn method_not_allowed(&self) -> &[H] {
        &self.method_not_allowed
    }

    /// Tree for `method`, if any route was registered under it.
    pub fn tree(&self, method: &str) -> Option<&Tree<H>> {
        self.trees.get(method)
    }

    /// Methods that have at least one route, in sorted order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    /// Total number of registered `(method, pattern)` pairs.
    pub fn route_count(&self) -> usize {
        self.trees.values().map(Tree::len).sum()
    }

    /// Resolve a request.
    pub fn find<'r, 'p>(&'r self, method: &str, path: &'p str) -> Lookup<'r, 'p, H> {
        if !self.is_allowed(method) {
            return Lookup::MethodNotAllowed;
        }
        match self.trees.get(method) {
            None => Lookup::MethodNotAllowed,
            Some(tree) => tree.find(path).map_or(Lookup::NotFound, Lookup::Found),
        }
    }

    /// A group rooted at `prefix` with an empty handler prefix.
    pub fn group(&mut self, prefix: &str) -> Group<'_, H> {
        Group::new(self, prefix)
    }
}

impl<H: Clone> Router<H> {
    /// Register the same chain under each of `methods`.
    pub fn on(&mut self, methods: &[&str], pattern: &str, handlers: Vec<H>) -> Result<(), RegistrationError> {
        for method in methods {
            self.add_route(method, pattern, handlers.clone())?;
        }
        Ok(())
    }

    /// Register the same chain under every allowed method.
    pub fn any(&mut self, pattern: &str, handlers: Vec<H>) -> Result<(), RegistrationError> {
        let methods = self.allowed.clone();
        for method in &methods {
            self.add_route(method, pattern, handlers.clone())?;
        }
        Ok(())
    }
}

/// `^[A-Z]+$`
pub(crate) fn is_method_token(method: &str) -> bool {
    !method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase())
}
