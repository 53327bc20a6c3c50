//! String matching types and compilation.
//!
//! Used for request body text, header values and query parameters. A value
//! in the configuration is either a plain string (exact equality) or an
//! operator object such as `{ "contains": "json" }`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// String matching operator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum StringMatcher {
    /// Exact string equality
    #[serde(rename = "equals")]
    Equals(String),

    /// String contains substring
    #[serde(rename = "contains")]
    Contains(String),

    /// String starts with prefix
    #[serde(rename = "startsWith")]
    StartsWith(String),

    /// String ends with suffix
    #[serde(rename = "endsWith")]
    EndsWith(String),

    /// Regex pattern match
    #[serde(rename = "matches")]
    Matches(String),

    /// Field existence check (value is whether field should exist)
    #[serde(rename = "exists")]
    Exists(bool),
}

/// A matcher as written in configuration: bare string or operator object.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ValueMatcher {
    Literal(String),
    Operator(StringMatcher),
}

impl ValueMatcher {
    pub fn into_matcher(self) -> StringMatcher {
        match self {
            ValueMatcher::Literal(value) => StringMatcher::Equals(value),
            ValueMatcher::Operator(matcher) => matcher,
        }
    }
}

impl From<&str> for ValueMatcher {
    fn from(value: &str) -> Self {
        ValueMatcher::Literal(value.to_string())
    }
}

/// Compiled string matcher for runtime evaluation.
#[derive(Debug, Clone)]
pub enum CompiledStringMatcher {
    Equals(String),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    Matches(Arc<Regex>),
    Exists(bool),
}

impl CompiledStringMatcher {
    /// Compile a StringMatcher; only `matches` can fail.
    pub fn compile(matcher: &StringMatcher) -> Result<Self, regex::Error> {
        Ok(match matcher {
            StringMatcher::Equals(v) => CompiledStringMatcher::Equals(v.clone()),
            StringMatcher::Contains(v) => CompiledStringMatcher::Contains(v.clone()),
            StringMatcher::StartsWith(v) => CompiledStringMatcher::StartsWith(v.clone()),
            StringMatcher::EndsWith(v) => CompiledStringMatcher::EndsWith(v.clone()),
            StringMatcher::Matches(pattern) => {
                CompiledStringMatcher::Matches(Arc::new(Regex::new(pattern)?))
            }
            StringMatcher::Exists(exists) => CompiledStringMatcher::Exists(*exists),
        })
    }

    /// Check a value against this matcher. `None` means the field is absent.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (CompiledStringMatcher::Exists(should_exist), v) => *should_exist == v.is_some(),

            // For all other matchers, value must exist
            (_, None) => false,

            (CompiledStringMatcher::Equals(expected), Some(v)) => v == expected,
            (CompiledStringMatcher::Contains(needle), Some(v)) => v.contains(needle.as_str()),
            (CompiledStringMatcher::StartsWith(prefix), Some(v)) => v.starts_with(prefix.as_str()),
            (CompiledStringMatcher::EndsWith(suffix), Some(v)) => v.ends_with(suffix.as_str()),
            (CompiledStringMatcher::Matches(regex), Some(v)) => regex.is_match(v),
        }
    }
}
