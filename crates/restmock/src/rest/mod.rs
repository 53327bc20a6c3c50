//! REST resource compiler and dispatch engine.
//!
//! A configuration describes a forest of resources:
//!
//! ```text
//! targets            GET(id=1) GET(id=2) POST
//!   └─ 1 / subs      GET(id=1)
//!        └─ 1 / sub-subs   GET(id=1)
//! ```
//!
//! `compile` flattens it into a `RoutingTable` of `CompiledRoute`s, one per
//! method handler, in pre-order. `RoutingTable::dispatch` selects the first
//! route whose predicate (method AND path AND extra constraints) holds.
//!
//! ## Module Structure
//!
//! - `definition`: resource and method handler definitions
//! - `compiler`: tree walk producing the routing table
//! - `route`: a single compiled route
//! - `table`: the routing table and first-match dispatch
//! - `registry`: the shared, swappable active table
//! - `error`: configuration and dispatch errors

mod compiler;
mod definition;
mod error;
mod registry;
mod route;
mod table;

pub use compiler::compile;
pub use definition::{MethodHandlerDefinition, ResourceDefinition, SubResourceDefinition};
pub use error::{ConfigurationError, NoRouteFound};
pub use registry::RouteRegistry;
pub use route::CompiledRoute;
pub use table::{RouteMatch, RoutingTable};

// Identifier matching is part of the resource model
pub use crate::predicate::IdentifierMatcher;
