//! Resource tree as written in the configuration document.

use crate::predicate::{IdentifierMatcher, ValueMatcher};
use crate::request::HttpMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named resource with per-method handlers and nested sub-resources.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ResourceSetting {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub get: Vec<MethodSetting>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<MethodSetting>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub put: Vec<MethodSetting>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<MethodSetting>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub head: Vec<MethodSetting>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patch: Vec<MethodSetting>,
    /// Sub-resources, each attached under one parent identifier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<SubResourceSetting>,
}

impl ResourceSetting {
    /// Handler lists keyed by method.
    pub fn methods(&self) -> [(HttpMethod, &[MethodSetting]); 6] {
        [
            (HttpMethod::Get, self.get.as_slice()),
            (HttpMethod::Post, self.post.as_slice()),
            (HttpMethod::Put, self.put.as_slice()),
            (HttpMethod::Delete, self.delete.as_slice()),
            (HttpMethod::Head, self.head.as_slice()),
            (HttpMethod::Patch, self.patch.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SubResourceSetting {
    /// Identifier of the parent instance this resource hangs off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdSetting>,
    #[serde(flatten)]
    pub resource: ResourceSetting,
}

/// Identifier as written: `"1"`, `1` or `"*"`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum IdSetting {
    Text(String),
    Number(i64),
}

impl IdSetting {
    pub fn to_matcher(&self) -> IdentifierMatcher {
        match self {
            IdSetting::Text(value) => IdentifierMatcher::parse(value),
            IdSetting::Number(value) => IdentifierMatcher::Exact(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct MethodSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSetting>,
}

/// Extra request constraints; all present fields must hold.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RequestSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ValueMatcher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ValueMatcher>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub queries: BTreeMap<String, ValueMatcher>,
}

impl RequestSetting {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.json.is_none()
            && self.headers.is_empty()
            && self.queries.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResponseSetting {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    /// Enable `${request.*}` substitution
    #[serde(default)]
    pub template: bool,
    /// Delay in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
}

fn default_status() -> u16 {
    200
}

impl Default for ResponseSetting {
    fn default() -> Self {
        Self {
            status: default_status(),
            headers: BTreeMap::new(),
            text: None,
            json: None,
            template: false,
            latency: None,
        }
    }
}
