// Library exports for the binary and integration tests

// ===== Core engine =====
pub mod predicate;
pub mod request;
pub mod response;
pub mod rest;
pub mod template;

// ===== Loading and serving =====
pub mod config;
pub mod metrics;
pub mod server;

pub use config::{Config, ConfigError};
pub use request::{HttpMethod, MockRequest};
pub use rest::{ConfigurationError, NoRouteFound, RouteRegistry, RoutingTable};
pub use server::MockServer;
