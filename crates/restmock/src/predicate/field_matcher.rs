//! Named-field matchers for headers and query parameters.

use super::string_matcher::{CompiledStringMatcher, StringMatcher};
use crate::request::MockRequest;

/// Which part of the request a field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Header,
    Query,
}

/// Compiled field matcher for runtime evaluation.
#[derive(Debug, Clone)]
pub struct CompiledFieldMatcher {
    /// Field name (lowercased for headers)
    pub name: String,
    pub source: FieldSource,
    pub matcher: CompiledStringMatcher,
}

impl CompiledFieldMatcher {
    pub fn compile(
        source: FieldSource,
        name: &str,
        matcher: &StringMatcher,
    ) -> Result<Self, regex::Error> {
        let name = match source {
            FieldSource::Header => name.to_lowercase(),
            FieldSource::Query => name.to_string(),
        };
        Ok(Self {
            name,
            source,
            matcher: CompiledStringMatcher::compile(matcher)?,
        })
    }

    pub fn matches(&self, request: &MockRequest) -> bool {
        let value = match self.source {
            FieldSource::Header => request.header(&self.name),
            FieldSource::Query => request.query_param(&self.name),
        };
        self.matcher.matches(value)
    }
}

/// Compile a header matcher (lowercases the header name).
pub fn compile_header_matcher(
    name: &str,
    matcher: &StringMatcher,
) -> Result<CompiledFieldMatcher, regex::Error> {
    CompiledFieldMatcher::compile(FieldSource::Header, name, matcher)
}

/// Compile a query matcher (preserves the parameter name).
pub fn compile_query_matcher(
    name: &str,
    matcher: &StringMatcher,
) -> Result<CompiledFieldMatcher, regex::Error> {
    CompiledFieldMatcher::compile(FieldSource::Query, name, matcher)
}
