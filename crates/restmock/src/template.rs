//! Response templating with request data.
//!
//! # Supported Template Variables
//!
//! - `${request.path}` - The request path
//! - `${request.method}` - The HTTP method
//! - `${request.query.<name>}` - Query parameter value
//! - `${request.headers.<name>}` - Header value (case-insensitive)
//! - `${request.pathParams.<resource>}` - Identifier captured for a resource
//! - `${request.body}` - The raw request body
//!
//! # Example
//!
//! ```yaml
//! response:
//!   template: true
//!   json: { id: "${request.pathParams.targets}", echo: "${request.query.message}" }
//! ```

use crate::predicate::PathParams;
use crate::request::MockRequest;
use regex::Regex;
use std::sync::OnceLock;

/// Regex for matching template variables: ${request.path}, ${request.query.name}, etc.
static TEMPLATE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_template_regex() -> &'static Regex {
    TEMPLATE_REGEX.get_or_init(|| {
        Regex::new(r"\$\{request\.([a-zA-Z_][a-zA-Z0-9_]*(?:\.[^}/]+)?)\}")
            .unwrap()
    })
}

/// Request data visible to templates.
#[derive(Debug, Clone, Copy)]
pub struct RequestData<'a> {
    pub request: &'a MockRequest,
    pub path_params: &'a PathParams,
}

impl<'a> RequestData<'a> {
    pub fn new(request: &'a MockRequest, path_params: &'a PathParams) -> Self {
        Self {
            request,
            path_params,
        }
    }

    /// Get a value by dotted path (e.g., "query.name", "headers.content-type")
    pub fn get(&self, path: &str) -> Option<String> {
        let parts: Vec<&str> = path.splitn(2, '.').collect();

        match parts.as_slice() {
            ["path"] => Some(self.request.path.clone()),
            ["method"] => Some(self.request.method.to_string()),
            ["body"] => Some(self.request.body.clone().unwrap_or_default()),
            ["query", name] => self.request.query_param(name).map(str::to_string),
            ["headers", name] => self.request.header(name).map(str::to_string),
            ["pathParams", name] | ["path_params", name] => {
                self.path_params.get(name).map(str::to_string)
            }
            _ => None,
        }
    }
}

/// Substitute `${request.*}` variables; unknown variables become empty.
pub fn process_template(template: &str, data: &RequestData<'_>) -> String {
    get_template_regex()
        .replace_all(template, |caps: &regex::Captures| {
            data.get(&caps[1]).unwrap_or_default()
        })
        .to_string()
}

/// Apply templating to every string inside a JSON value.
pub fn process_json_template(
    value: &serde_json::Value,
    data: &RequestData<'_>,
) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::String(s) => Value::String(process_template(s, data)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| process_json_template(item, data))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), process_json_template(v, data)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Check if a string contains template variables
pub fn has_template_variables(s: &str) -> bool {
    get_template_regex().is_match(s)
}
