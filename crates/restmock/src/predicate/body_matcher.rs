//! Request body matchers: text operators and structural JSON equality.

use super::string_matcher::{CompiledStringMatcher, StringMatcher};

/// Compiled body matcher.
#[derive(Debug, Clone)]
pub enum CompiledBodyMatcher {
    /// Raw body text compared with a string operator
    Text(CompiledStringMatcher),
    /// Body parsed as JSON and compared structurally, so key order and
    /// whitespace are irrelevant
    Json(serde_json::Value),
}

impl CompiledBodyMatcher {
    pub fn text(matcher: &StringMatcher) -> Result<Self, regex::Error> {
        Ok(CompiledBodyMatcher::Text(CompiledStringMatcher::compile(
            matcher,
        )?))
    }

    pub fn json(expected: serde_json::Value) -> Self {
        CompiledBodyMatcher::Json(expected)
    }

    /// An absent body is the empty body for every text operator except
    /// `exists`, which only holds for a non-empty body.
    pub fn matches(&self, body: Option<&str>) -> bool {
        match self {
            CompiledBodyMatcher::Text(matcher @ CompiledStringMatcher::Exists(_)) => {
                matcher.matches(body.filter(|b| !b.is_empty()))
            }
            CompiledBodyMatcher::Text(matcher) => matcher.matches(Some(body.unwrap_or(""))),
            CompiledBodyMatcher::Json(expected) => body
                .and_then(|b| serde_json::from_str::<serde_json::Value>(b).ok())
                .is_some_and(|actual| actual == *expected),
        }
    }
}
