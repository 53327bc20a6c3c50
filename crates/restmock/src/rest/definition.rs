//! Resource tree as handed over by the configuration loader.

use crate::predicate::{IdentifierMatcher, RequestPredicate};
use crate::request::HttpMethod;
use crate::response::{ResponseHandler, ResponseHandlerRef};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One configured handler for one HTTP method of a resource.
#[derive(Clone)]
pub struct MethodHandlerDefinition {
    pub method: HttpMethod,
    /// `None` targets the collection path (`/targets`), otherwise the
    /// single-instance path (`/targets/{id}`)
    pub identifier: Option<IdentifierMatcher>,
    /// Additional constraints ANDed with method and path
    pub extra_predicate: Option<RequestPredicate>,
    /// Mandatory; a definition without one fails compilation
    pub response: Option<ResponseHandlerRef>,
}

impl MethodHandlerDefinition {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            identifier: None,
            extra_predicate: None,
            response: None,
        }
    }

    pub fn with_id(mut self, identifier: IdentifierMatcher) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_predicate(mut self, predicate: RequestPredicate) -> Self {
        self.extra_predicate = Some(predicate);
        self
    }

    pub fn with_response<H: ResponseHandler + 'static>(self, handler: H) -> Self {
        self.with_response_ref(Arc::new(handler))
    }

    pub fn with_response_ref(mut self, handler: ResponseHandlerRef) -> Self {
        self.response = Some(handler);
        self
    }
}

impl fmt::Debug for MethodHandlerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandlerDefinition")
            .field("method", &self.method)
            .field("identifier", &self.identifier)
            .field("extra_predicate", &self.extra_predicate)
            .field("has_response", &self.response.is_some())
            .finish()
    }
}

/// A named resource with its handlers and nested resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceDefinition {
    pub name: String,
    /// Handlers grouped by method; iteration order is compilation order
    pub handlers: BTreeMap<HttpMethod, Vec<MethodHandlerDefinition>>,
    pub sub_resources: Vec<SubResourceDefinition>,
}

/// A nested resource and the parent identifier it hangs under.
///
/// `/targets/1/subs` is the resource `subs` attached to `targets` with parent
/// identifier `1`.
#[derive(Debug, Clone)]
pub struct SubResourceDefinition {
    pub parent_id: Option<IdentifierMatcher>,
    pub resource: ResourceDefinition,
}

impl ResourceDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a handler after any already declared for the same method.
    pub fn handler(mut self, definition: MethodHandlerDefinition) -> Self {
        self.handlers
            .entry(definition.method)
            .or_default()
            .push(definition);
        self
    }

    /// Attach a sub-resource reachable under `parent_id`.
    pub fn sub_resource(
        mut self,
        parent_id: IdentifierMatcher,
        resource: ResourceDefinition,
    ) -> Self {
        self.sub_resources.push(SubResourceDefinition {
            parent_id: Some(parent_id),
            resource,
        });
        self
    }

    /// Number of method handlers in this resource and all of its descendants.
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum::<usize>()
            + self
                .sub_resources
                .iter()
                .map(|sub| sub.resource.handler_count())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::CannedResponse;

    #[test]
    fn test_handlers_grouped_in_method_order() {
        let resource = ResourceDefinition::new("targets")
            .handler(MethodHandlerDefinition::new(HttpMethod::Patch))
            .handler(
                MethodHandlerDefinition::new(HttpMethod::Get)
                    .with_id(IdentifierMatcher::parse("1")),
            )
            .handler(
                MethodHandlerDefinition::new(HttpMethod::Get)
                    .with_id(IdentifierMatcher::parse("2")),
            );

        let methods: Vec<HttpMethod> = resource.handlers.keys().copied().collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Patch]);

        let gets = &resource.handlers[&HttpMethod::Get];
        assert_eq!(gets[0].identifier, Some(IdentifierMatcher::parse("1")));
        assert_eq!(gets[1].identifier, Some(IdentifierMatcher::parse("2")));
    }

    #[test]
    fn test_handler_count_includes_sub_resources() {
        let resource = ResourceDefinition::new("targets")
            .handler(
                MethodHandlerDefinition::new(HttpMethod::Post)
                    .with_response(CannedResponse::text("ok")),
            )
            .sub_resource(
                IdentifierMatcher::Any,
                ResourceDefinition::new("subs")
                    .handler(MethodHandlerDefinition::new(HttpMethod::Get))
                    .handler(MethodHandlerDefinition::new(HttpMethod::Delete)),
            );
        assert_eq!(resource.handler_count(), 3);
    }

    #[test]
    fn test_debug_hides_handler() {
        let def =
            MethodHandlerDefinition::new(HttpMethod::Head).with_response(CannedResponse::text("x"));
        let debug = format!("{def:?}");
        assert!(debug.contains("has_response: true"));
    }
}
