//! Response handlers invoked for a matched route.
//!
//! The routing table only stores `ResponseHandlerRef`s and never looks inside
//! them. `CannedResponse` is the implementation built from configuration.

mod builder;
mod canned;

use crate::predicate::PathParams;
use crate::request::MockRequest;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::sync::Arc;
use thiserror::Error;

pub use builder::{build_response, error_response, ResponseBuilder};
pub use canned::{CannedBody, CannedResponse};

pub type MockResponse = Response<Full<Bytes>>;

/// Shared handle to a response handler, cloned into every route that uses it.
pub type ResponseHandlerRef = Arc<dyn ResponseHandler>;

/// Produces the response for a matched request.
#[async_trait]
pub trait ResponseHandler: Send + Sync {
    async fn respond(
        &self,
        request: &MockRequest,
        params: &PathParams,
    ) -> Result<MockResponse, HandlerError>;
}

/// Failure while executing a matched handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid response header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to build response: {0}")]
    Build(#[from] hyper::http::Error),
}
