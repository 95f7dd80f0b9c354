//! Route registration errors.
//!
//! Lookup never fails: a miss is a defined negative result, not an error.
//! Everything in this module is raised at registration time so that a
//! misconfigured route table is rejected before it serves traffic.

use thiserror::Error;

/// Why a pattern string was rejected before touching the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern is the empty string.
    #[error("pattern is empty")]
    Empty,

    /// The pattern does not begin with `/`.
    #[error("pattern must begin with '/'")]
    MissingLeadingSlash,

    /// A `:` or `*` marker is not followed by a name.
    #[error("parameter at byte {0} has an empty name")]
    EmptyName(usize),

    /// A `:` or `*` marker appears in the middle of a segment.
    #[error("'{marker}' at byte {offset} must start a path segment")]
    MarkerInsideSegment { marker: char, offset: usize },

    /// A wildcard is followed by more path.
    #[error("wildcard `*{0}` must be the final segment")]
    WildcardNotLast(String),

    /// The same parameter name is bound twice in one pattern.
    #[error("parameter `{0}` appears more than once")]
    DuplicateName(String),
}

/// Errors raised while adding a route to a [`Tree`](crate::routing::Tree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The pattern failed syntactic validation.
    #[error("malformed pattern `{pattern}`: {source}")]
    MalformedPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    /// A differently named parameter or wildcard already occupies the same
    /// tree position. Lookup cannot disambiguate by name, so this is a
    /// configuration error.
    #[error("pattern `{pattern}` binds `{new}` at `{position}` where `{existing}` is already registered")]
    ConflictingParameter {
        pattern: String,
        position: String,
        existing: String,
        new: String,
    },

    /// The handler chain is empty.
    #[error("pattern `{pattern}` has an empty handler chain")]
    EmptyHandlers { pattern: String },

    /// The method is not in the router's allowed list.
    #[error("method `{method}` is not allowed")]
    UnsupportedMethod { method: String },
}

impl RouteError {
    pub(crate) fn malformed(pattern: &str, source: PatternError) -> Self {
        RouteError::MalformedPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}

/// A [`RouteError`] with the HTTP method it was registered under.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot register {method} route: {source}")]
pub struct RegistrationError {
    pub method: String,
    #[source]
    pub source: RouteError,
}

/// Result type for route registration.
pub type RouteResult<T> = Result<T, RouteError>;
