//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every pattern parsed)
//!     → builder.rs (register routes and groups into a Router)
//!     → published through SharedRouter
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs → validation.rs → builder.rs
//!     → new Router sent to the server, which publishes it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod builder;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use builder::build_router;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    GroupConfig, ListenerConfig, LogFormat, ObservabilityConfig, RouteConfig, RouterConfig,
    RoutingConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
