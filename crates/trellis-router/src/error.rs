//! Error types for route matching and assembly.

use thiserror::Error;

/// Errors produced while compiling patterns, matching paths or assembling
/// URLs.
///
/// A path that simply does not match any route is *not* an error; the
/// matching operations report that as `Ok(None)`.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route pattern could not be compiled into a matcher.
    #[error("invalid route pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An assertion pattern for a parameter could not be compiled.
    #[error("invalid assertion for param \"{name}\": {reason}")]
    InvalidAssertion { name: String, reason: String },

    /// A configured parser or stringifier rejected a parameter value.
    #[error("transform failed for param \"{name}\": {reason}")]
    Transform { name: String, reason: String },

    /// No route carries the requested name.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// A route id does not belong to this tree.
    #[error("route id {0} does not belong to this tree")]
    UnknownRoute(usize),

    /// Match recursion exceeded the depth bound.
    #[error("match recursion exceeded {depth} levels")]
    DepthExceeded { depth: usize },
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
