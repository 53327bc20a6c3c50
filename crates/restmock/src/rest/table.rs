use super::compiler;
use super::definition::ResourceDefinition;
use super::error::{ConfigurationError, NoRouteFound};
use super::route::CompiledRoute;
use crate::predicate::PathParams;
use crate::request::MockRequest;
use crate::response::{HandlerError, MockResponse, ResponseHandlerRef};
use std::fmt;

/// Ordered, immutable list of compiled routes.
///
/// Position in the table is match precedence: the first route whose
/// predicate holds wins, whatever more specific routes follow it.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: Vec<CompiledRoute>,
}

/// The route selected for a request, with identifiers captured from the path.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub index: usize,
    pub route: &'a CompiledRoute,
    pub params: PathParams,
}

impl RouteMatch<'_> {
    pub fn handler(&self) -> &ResponseHandlerRef {
        self.route.handler()
    }

    /// Run the matched handler. Its errors are passed through unchanged.
    pub async fn respond(&self, request: &MockRequest) -> Result<MockResponse, HandlerError> {
        self.route.handler().respond(request, &self.params).await
    }
}

impl RoutingTable {
    pub fn new(routes: Vec<CompiledRoute>) -> Self {
        Self { routes }
    }

    /// Compile a resource forest into a table.
    pub fn compile(resources: &[ResourceDefinition]) -> Result<Self, ConfigurationError> {
        compiler::compile(resources)
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First-match-wins lookup in table order.
    pub fn dispatch(&self, request: &MockRequest) -> Result<RouteMatch<'_>, NoRouteFound> {
        self.routes
            .iter()
            .enumerate()
            .find(|(_, route)| route.matches(request))
            .map(|(index, route)| RouteMatch {
                index,
                route,
                params: route
                    .pattern()
                    .captures(&request.segments)
                    .unwrap_or_default(),
            })
            .ok_or_else(|| NoRouteFound {
                method: request.method.to_string(),
                path: request.path.clone(),
            })
    }
}

impl fmt::Display for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, route) in self.routes.iter().enumerate() {
            writeln!(
                f,
                "{index:>4}  {:<7}{}",
                route.method().as_str(),
                route.pattern()
            )?;
        }
        Ok(())
    }
}
