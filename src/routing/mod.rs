//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (startup or reload):
//!     (method, pattern, handlers)
//!     → router.rs (allowed method? pick or create the method's tree)
//!     → pattern.rs (split into static runs, :params, *wildcard)
//!     → tree.rs (conflict walk, then split/append nodes in node.rs)
//!     → shared.rs (publish the finished Router as one snapshot)
//!
//! Incoming Request (method, path)
//!     → router.rs (tree for method, else MethodNotAllowed)
//!     → tree.rs (static > param > wildcard, backtracking on dead ends)
//!     → Return: handlers + params + matched pattern, or NotFound
//! ```
//!
//! # Design Decisions
//! - Nodes live in an arena and link by index
//! - Trees are immutable once published (lock-free lookups)
//! - Registration is atomic per pattern
//! - No regex constraints; values are raw strings

pub mod error;
pub mod group;
pub mod node;
pub mod params;
pub mod path;
pub mod pattern;
pub mod router;
pub mod shared;
pub mod tree;

pub use error::{PatternError, RegistrationError, RouteError};
pub use group::Group;
pub use node::{Node, NodeId, NodeKind};
pub use params::Params;
pub use router::{Lookup, Router, DEFAULT_METHODS};
pub use shared::SharedRouter;
pub use tree::{Insertion, Match, Tree};
