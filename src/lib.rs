//! Radix-tree HTTP request router.
//!
//! Routes are registered per HTTP method as patterns made of static text,
//! `:name` parameters and a trailing `*name` wildcard. Lookup walks the
//! method's compressed tree, preferring static over parameter over wildcard
//! edges and backtracking on dead ends.
//!
//! ```
//! use radix_router::routing::Router;
//!
//! let mut router = Router::new();
//! router.get("/users/:id", vec!["show_user"]).unwrap();
//! router.get("/static/*path", vec!["serve_file"]).unwrap();
//!
//! let m = router.find("GET", "/users/42").into_match().unwrap();
//! assert_eq!(m.handlers, &["show_user"]);
//! assert_eq!(m.params.get("id"), Some("42"));
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Lookup, Params, Router, SharedRouter};
