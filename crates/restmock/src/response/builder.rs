use super::{HandlerError, MockResponse};
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, Response, StatusCode};
use serde::Serialize;

/// Assembles a `MockResponse`, failing on header names or values hyper rejects.
pub struct ResponseBuilder {
    status: StatusCode,
    body: Bytes,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        ResponseBuilder {
            status,
            body: Bytes::new(),
            headers: HeaderMap::new(),
        }
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self, HandlerError> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| HandlerError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| HandlerError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.headers.append(header_name, header_value);
        Ok(self)
    }

    /// Set a header only if the configuration did not already provide it.
    pub fn default_header(mut self, name: HeaderName, value: &'static str) -> Self {
        if !self.headers.contains_key(&name) {
            self.headers.insert(name, HeaderValue::from_static(value));
        }
        self
    }

    pub fn build(self) -> Result<MockResponse, HandlerError> {
        let mut response = Response::builder()
            .status(self.status)
            .body(Full::new(self.body))?;
        response.headers_mut().extend(self.headers);
        Ok(response)
    }
}

/// Build an HTTP response without extra headers.
pub fn build_response(status: StatusCode, body: impl Into<Bytes>) -> MockResponse {
    Response::builder()
        .status(status)
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

/// JSON error response used for engine-level failures (no route, handler error).
pub fn error_response(
    status: StatusCode,
    message: &str,
    method: Option<&str>,
    path: Option<&str>,
) -> MockResponse {
    let body = ErrorBody {
        error: message,
        method,
        path,
    };
    let json = serde_json::to_vec(&body).unwrap_or_default();
    let mut response = build_response(status, json);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_builder_sets_status_headers_body() {
        let response = ResponseBuilder::new(StatusCode::CREATED)
            .header("Location", "/targets/123")
            .unwrap()
            .body("created")
            .build()
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["location"], "/targets/123");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("created"));
    }

    #[test]
    fn test_builder_rejects_invalid_header() {
        let err = ResponseBuilder::new(StatusCode::OK)
            .header("bad header", "x")
            .err()
            .unwrap();
        assert!(matches!(err, HandlerError::InvalidHeader { .. }));
    }

    #[test]
    fn test_default_header_does_not_override() {
        let response = ResponseBuilder::new(StatusCode::OK)
            .header("Content-Type", "application/hal+json")
            .unwrap()
            .default_header(CONTENT_TYPE, "application/json")
            .build()
            .unwrap();
        assert_eq!(response.headers()[CONTENT_TYPE], "application/hal+json");
    }

    #[tokio::test]
    async fn test_error_response_is_json() {
        let response = error_response(StatusCode::NOT_FOUND, "no route", Some("GET"), Some("/x"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "no route");
        assert_eq!(value["path"], "/x");
    }
}
