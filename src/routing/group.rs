//! Route groups.
//!
//! A group shares a base path and a handler prefix between routes. Handlers
//! added with [`Group::use_handlers`] run after those already on the group,
//! handlers added with [`Group::pre`] run before them, and both run before
//! the route's own chain.

use crate::routing::error::RegistrationError;
use crate::routing::path::join_paths;
use crate::routing::router::Router;
use crate::routing::tree::Insertion;

/// Registers routes into a [`Router`] under a common prefix.
#[derive(Debug)]
pub struct Group<'r, H> {
    router: &'r mut Router<H>,
    base_path: String,
    handlers: Vec<H>,
}

impl<'r, H> Group<'r, H> {
    pub(crate) fn new(router: &'r mut Router<H>, prefix: &str) -> Self {
        Self {
            router,
            base_path: join_paths("/", prefix),
            handlers: Vec::new(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Handlers every route in this group starts with.
    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }

    /// Append middleware to the group chain.
    pub fn use_handlers(&mut self, handlers: impl IntoIterator<Item = H>) -> &mut Self {
        self.handlers.extend(handlers);
        self
    }

    /// Prepend middleware to the group chain.
    pub fn pre(&mut self, handlers: impl IntoIterator<Item = H>) -> &mut Self {
        let mut chain: Vec<H> = handlers.into_iter().collect();
        chain.append(&mut self.handlers);
        self.handlers = chain;
        self
    }
}

impl<'r, H: Clone> Group<'r, H> {
    /// A nested group. It inherits this group's base path and handlers.
    pub fn group(&mut self, relative: &str) -> Group<'_, H> {
        Group {
            base_path: join_paths(&self.base_path, relative),
            handlers: self.handlers.clone(),
            router: &mut *self.router,
        }
    }

    /// Register `handlers` after the group chain at `relative`.
    pub fn handle(&mut self, method: &str, relative: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        let pattern = join_paths(&self.base_path, relative);
        let mut chain = Vec::with_capacity(self.handlers.len() + handlers.len());
        chain.extend_from_slice(&self.handlers);
        chain.extend(handlers);
        self.router.add_route(method, &pattern, chain)
    }

    pub fn get(&mut self, relative: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.handle("GET", relative, handlers)
    }

    pub fn post(&mut self, relative: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.handle("POST", relative, handlers)
    }

    pub fn put(&mut self, relative: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.handle("PUT", relative, handlers)
    }

    pub fn delete(&mut self, relative: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.handle("DELETE", relative, handlers)
    }

    pub fn patch(&mut self, relative: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.handle("PATCH", relative, handlers)
    }

    pub fn head(&mut self, relative: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.handle("HEAD", relative, handlers)
    }

    pub fn options(&mut self, relative: &str, handlers: Vec<H>) -> Result<Insertion, RegistrationError> {
        self.handle("OPTIONS", relative, handlers)
    }

    /// Register under each of `methods`.
    pub fn on(&mut self, methods: &[&str], relative: &str, handlers: Vec<H>) -> Result<(), RegistrationError> {
        for method in methods {
            self.handle(method, relative, handlers.clone())?;
        }
        Ok(())
    }

    /// Register under every method the router allows.
    pub fn any(&mut self, relative: &str, handlers: Vec<H>) -> Result<(), RegistrationError> {
        let methods = self.router.allowed_methods().to_vec();
        for method in &methods {
            self.handle(method, relative, handlers.clone())?;
        }
        Ok(())
    }
}
