use crate::predicate::{PathPattern, RequestPredicate};
use crate::request::{HttpMethod, MockRequest};
use crate::response::ResponseHandlerRef;
use std::fmt;

/// One routing rule: a predicate and the handler it selects.
#[derive(Clone)]
pub struct CompiledRoute {
    method: HttpMethod,
    pattern: PathPattern,
    predicate: RequestPredicate,
    handler: ResponseHandlerRef,
}

impl CompiledRoute {
    /// The route predicate is method AND path AND the extra predicate, in
    /// that evaluation order.
    pub fn new(
        method: HttpMethod,
        pattern: PathPattern,
        extra_predicate: Option<RequestPredicate>,
        handler: ResponseHandlerRef,
    ) -> Self {
        let predicate = RequestPredicate::Method(method)
            .and(RequestPredicate::Path(pattern.clone()))
            .and(extra_predicate.unwrap_or_else(RequestPredicate::always));

        Self {
            method,
            pattern,
            predicate,
            handler,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn predicate(&self) -> &RequestPredicate {
        &self.predicate
    }

    pub fn handler(&self) -> &ResponseHandlerRef {
        &self.handler
    }

    pub fn matches(&self, request: &MockRequest) -> bool {
        self.predicate.matches(request)
    }
}

impl fmt::Display for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("method", &self.method)
            .field("pattern", &self.pattern.to_string())
            .field("predicate", &self.predicate)
            .finish_non_exhaustive()
    }
}
