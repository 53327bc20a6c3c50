//! Canned responses configured per method handler.

use super::builder::ResponseBuilder;
use super::{HandlerError, MockResponse, ResponseHandler};
use crate::predicate::PathParams;
use crate::request::MockRequest;
use crate::template::{process_json_template, process_template, RequestData};
use async_trait::async_trait;
use hyper::header::CONTENT_TYPE;
use hyper::StatusCode;
use std::time::Duration;

/// Body of a canned response.
#[derive(Debug, Clone, PartialEq)]
pub enum CannedBody {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

/// Fixed (optionally templated) response.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: CannedBody,
    /// Apply `${request.*}` substitution to body and header values
    pub template: bool,
    /// Delay before the response is produced
    pub latency: Option<Duration>,
}

impl CannedResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: CannedBody::Empty,
            template: false,
            latency: None,
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK).with_body(CannedBody::Text(body.into()))
    }

    pub fn json(body: serde_json::Value) -> Self {
        Self::new(StatusCode::OK).with_body(CannedBody::Json(body))
    }

    pub fn with_body(mut self, body: CannedBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_template(mut self, template: bool) -> Self {
        self.template = template;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn render(&self, data: &RequestData<'_>) -> Result<MockResponse, HandlerError> {
        let mut builder = ResponseBuilder::new(self.status);
        for (name, value) in &self.headers {
            let value = if self.template {
                process_template(value, data)
            } else {
                value.clone()
            };
            builder = builder.header(name, &value)?;
        }

        let builder = match &self.body {
            CannedBody::Empty => builder,
            CannedBody::Text(text) => {
                let text = if self.template {
                    process_template(text, data)
                } else {
                    text.clone()
                };
                builder
                    .default_header(CONTENT_TYPE, "text/plain; charset=utf-8")
                    .body(text)
            }
            CannedBody::Json(value) => {
                let bytes = if self.template {
                    serde_json::to_vec(&process_json_template(value, data))?
                } else {
                    serde_json::to_vec(value)?
                };
                builder
                    .default_header(CONTENT_TYPE, "application/json")
                    .body(bytes)
            }
        };

        builder.build()
    }
}

#[async_trait]
impl ResponseHandler for CannedResponse {
    async fn respond(
        &self,
        request: &MockRequest,
        params: &PathParams,
    ) -> Result<MockResponse, HandlerError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.render(&RequestData::new(request, params))
    }
}
