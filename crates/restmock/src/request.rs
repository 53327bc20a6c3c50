//! Transport-neutral view of an incoming request.
//!
//! The server builds one `MockRequest` per inbound HTTP request after the body
//! has been collected. Predicates, the routing table and response handlers only
//! ever see this type, never hyper's streaming request.

use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// HTTP methods a resource can configure handlers for.
///
/// The derived ordering is the order in which a resource's handlers are
/// compiled into the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether a request method is this method.
    pub fn is(&self, method: &Method) -> bool {
        *method == self.to_method()
    }

    pub fn to_method(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully buffered request as seen by the matching engine.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    /// Raw request path, without the query string
    pub path: String,
    /// Percent-decoded path segments (`/targets/1` -> `["targets", "1"]`)
    pub segments: Vec<String>,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl MockRequest {
    /// Build a request from a method and a path with optional query string.
    pub fn new(method: Method, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };

        Self {
            method,
            path: path.to_string(),
            segments: split_segments(path),
            query: parse_query_string(query),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Build a request from hyper request parts and an already collected body.
    pub fn from_parts(parts: &hyper::http::request::Parts, body: Option<String>) -> Self {
        let path = parts.uri.path();
        Self {
            method: parts.method.clone(),
            path: path.to_string(),
            segments: split_segments(path),
            query: parse_query_string(parts.uri.query()),
            headers: parts.headers.clone(),
            body,
        }
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// Split a path into percent-decoded segments.
///
/// The root path has no segments. A trailing slash yields a trailing empty
/// segment, so `/targets/` is not the same path as `/targets`.
pub fn split_segments(path: &str) -> Vec<String> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split('/')
        .map(|segment| match urlencoding::decode(segment) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => segment.to_string(),
        })
        .collect()
}

/// Parse a query string into a map, URL-decoding keys and values.
pub fn parse_query_string(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(q) = query {
        for pair in q.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                params.insert(decode_query_component(key), decode_query_component(value));
            } else if !pair.is_empty() {
                params.insert(decode_query_component(pair), String::new());
            }
        }
    }
    params
}

/// Form-style decoding: `+` is a space, then percent escapes.
fn decode_query_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
