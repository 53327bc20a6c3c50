use crate::request::HttpMethod;
use thiserror::Error;

/// A resource tree that cannot be turned into a routing table.
///
/// Any one of these aborts the whole load; no partial table is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{method} handler #{index} of resource '{path}' has no response")]
    MissingResponse {
        path: String,
        method: HttpMethod,
        index: usize,
    },

    #[error("sub-resource '{resource}' under '{parent}' has no parent id")]
    MissingParentId { resource: String, parent: String },

    #[error("resource '{name}' under '{parent}' has an invalid name: {reason}")]
    InvalidName {
        parent: String,
        name: String,
        reason: &'static str,
    },

    #[error("empty identifier under '{path}'")]
    EmptyIdentifier { path: String },

    #[error("invalid {field} matcher in {method} handler #{index} of resource '{path}': {reason}")]
    InvalidMatcher {
        path: String,
        method: HttpMethod,
        index: usize,
        field: String,
        reason: String,
    },

    #[error("invalid response in {method} handler #{index} of resource '{path}': {reason}")]
    InvalidResponse {
        path: String,
        method: HttpMethod,
        index: usize,
        reason: String,
    },
}

/// No compiled route accepts the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route for {method} {path}")]
pub struct NoRouteFound {
    pub method: String,
    pub path: String,
}
