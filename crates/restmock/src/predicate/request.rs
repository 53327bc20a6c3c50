//! Composable request predicates.

use super::body_matcher::CompiledBodyMatcher;
use super::field_matcher::CompiledFieldMatcher;
use super::path_matcher::PathPattern;
use crate::request::{HttpMethod, MockRequest};
use std::fmt;
use std::sync::Arc;

/// Extension point for conditions not expressible with the built-in matchers.
pub trait RequestMatcher: Send + Sync {
    fn matches(&self, request: &MockRequest) -> bool;
}

impl<F> RequestMatcher for F
where
    F: Fn(&MockRequest) -> bool + Send + Sync,
{
    fn matches(&self, request: &MockRequest) -> bool {
        self(request)
    }
}

/// Boolean condition over a request. Conjunctions are flattened into `All`.
#[derive(Clone)]
pub enum RequestPredicate {
    Method(HttpMethod),
    Path(PathPattern),
    Field(CompiledFieldMatcher),
    Body(CompiledBodyMatcher),
    Custom(Arc<dyn RequestMatcher>),
    /// Logical AND; an empty list holds for every request
    All(Vec<RequestPredicate>),
}

impl RequestPredicate {
    /// Predicate that holds for every request.
    pub fn always() -> Self {
        RequestPredicate::All(Vec::new())
    }

    pub fn custom<M: RequestMatcher + 'static>(matcher: M) -> Self {
        RequestPredicate::Custom(Arc::new(matcher))
    }

    /// Logical AND of two predicates.
    pub fn and(self, other: RequestPredicate) -> Self {
        let mut parts = self.into_parts();
        parts.extend(other.into_parts());
        if parts.len() == 1 {
            return parts.remove(0);
        }
        RequestPredicate::All(parts)
    }

    /// Logical AND over any number of predicates.
    pub fn all<I: IntoIterator<Item = RequestPredicate>>(predicates: I) -> Self {
        predicates
            .into_iter()
            .fold(RequestPredicate::always(), RequestPredicate::and)
    }

    fn into_parts(self) -> Vec<RequestPredicate> {
        match self {
            RequestPredicate::All(parts) => parts,
            other => vec![other],
        }
    }

    pub fn matches(&self, request: &MockRequest) -> bool {
        match self {
            RequestPredicate::Method(method) => method.is(&request.method),
            RequestPredicate::Path(pattern) => pattern.matches(&request.segments),
            RequestPredicate::Field(field) => field.matches(request),
            RequestPredicate::Body(body) => body.matches(request.body.as_deref()),
            RequestPredicate::Custom(matcher) => matcher.matches(request),
            RequestPredicate::All(parts) => parts.iter().all(|p| p.matches(request)),
        }
    }
}

impl fmt::Debug for RequestPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestPredicate::Method(method) => f.debug_tuple("Method").field(method).finish(),
            RequestPredicate::Path(pattern) => write!(f, "Path({pattern})"),
            RequestPredicate::Field(field) => f.debug_tuple("Field").field(field).finish(),
            RequestPredicate::Body(body) => f.debug_tuple("Body").field(body).finish(),
            RequestPredicate::Custom(_) => f.write_str("Custom(..)"),
            RequestPredicate::All(parts) => f.debug_tuple("All").field(parts).finish(),
        }
    }
}
