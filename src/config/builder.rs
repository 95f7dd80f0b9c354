//! Route table construction from a validated configuration.
//!
//! # Design Decisions
//! - Top-level routes register first, then groups, each in file order
//! - A group's handlers run before each of its routes' own chains
//! - Conflicts abort the whole build; nothing partial is returned
//! - The not-found and method-not-allowed chains ride on the router, so a
//!   reload replaces them together with the routes

use tracing::{info, warn};

use crate::config::loader::ConfigError;
use crate::config::schema::RouterConfig;
use crate::http::handler::Action;
use crate::routing::Router;

/// Build the router described by `config`.
pub fn build_router(config: &RouterConfig) -> Result<Router<Action>, ConfigError> {
    let mut router = Router::with_methods(config.router.allowed_methods.iter().cloned())?;
    router.set_not_found(config.router.not_found.clone());
    router.set_method_not_allowed(config.router.method_not_allowed.clone());

    for route in &config.routes {
        for method in &route.methods {
            router.add_route(method, &route.path, route.handlers.clone())?;
        }
    }

    for group_config in &config.groups {
        let mut group = router.group(&group_config.prefix);
        group.use_handlers(group_config.handlers.iter().cloned());
        for route in &group_config.routes {
            for method in &route.methods {
                group.handle(method, &route.path, route.handlers.clone())?;
            }
        }
    }

    if router.route_count() == 0 {
        warn!("No routes configured; every request will be rejected");
    }
    info!(
        routes = router.route_count(),
        methods = router.methods().count(),
        "Route table built"
    );
    Ok(router)
}
