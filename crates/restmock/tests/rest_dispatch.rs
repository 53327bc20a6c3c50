//! Integration tests for resource compilation and dispatch
//!
//! These tests load the fixture configuration, compile it into a routing table
//! and dispatch requests in-process without binding a socket.

use http_body_util::BodyExt;
use hyper::{Method, StatusCode};
use restmock::config::{Config, ConfigError};
use restmock::request::{HttpMethod, MockRequest};
use restmock::response::MockResponse;
use restmock::rest::{ConfigurationError, RouteRegistry, RoutingTable};
use restmock::server::dispatch;
use serde_json::{json, Value};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_registry() -> RouteRegistry {
    let config = Config::from_file(fixture("rest.json")).unwrap();
    RouteRegistry::new(config.compile().unwrap())
}

async fn send(registry: &RouteRegistry, request: MockRequest) -> MockResponse {
    dispatch(registry, &request).await
}

async fn json_body(response: MockResponse) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: MockResponse) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_get_resource_by_id() {
    let registry = load_registry();

    let body = json_body(send(&registry, MockRequest::new(Method::GET, "/targets/1")).await).await;
    assert_eq!(body, json!({"code": 1, "message": "foo"}));

    let body = json_body(send(&registry, MockRequest::new(Method::GET, "/targets/2")).await).await;
    assert_eq!(body, json!({"code": 2, "message": "bar"}));
}

#[tokio::test]
async fn test_post_to_collection() {
    let registry = load_registry();
    let request = MockRequest::new(Method::POST, "/targets")
        .with_body(r#"{"code": 1, "message": "hello"}"#);

    let response = send(&registry, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers().get("location").unwrap(), "/targets/123");
}

#[tokio::test]
async fn test_put_and_delete_instance() {
    let registry = load_registry();

    let put = MockRequest::new(Method::PUT, "/targets/1").with_body(r#"{"code": 1}"#);
    assert_eq!(send(&registry, put).await.status(), StatusCode::OK);

    let delete = MockRequest::new(Method::DELETE, "/targets/1");
    assert_eq!(send(&registry, delete).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_head_returns_headers() {
    let registry = load_registry();

    let response = send(&registry, MockRequest::new(Method::HEAD, "/targets/1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("etag").unwrap(), "Moco");

    let response = send(&registry, MockRequest::new(Method::HEAD, "/all-resources")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("etag").unwrap(), "Moco");
}

#[tokio::test]
async fn test_patch_gated_by_body() {
    let registry = load_registry();

    let matching = MockRequest::new(Method::PATCH, "/targets/1").with_body("result");
    let response = send(&registry, matching).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "patch result");

    let other = MockRequest::new(Method::PATCH, "/targets/1").with_body("something else");
    assert_eq!(send(&registry, other).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_id() {
    let registry = load_registry();

    for path in ["/any-targets/1", "/any-targets/999", "/any-targets/abc"] {
        let body = json_body(send(&registry, MockRequest::new(Method::GET, path)).await).await;
        assert_eq!(body, json!({"code": 1, "message": "any"}));
    }

    // An empty identifier segment is not an identifier
    let response = send(&registry, MockRequest::new(Method::GET, "/any-targets/")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_id_and_any_sub() {
    let registry = load_registry();

    for path in ["/any-targets/1/any-subs/1", "/any-targets/2/any-subs/2"] {
        let body = json_body(send(&registry, MockRequest::new(Method::GET, path)).await).await;
        assert_eq!(body, json!({"code": 100, "message": "any-sub"}));
    }
}

#[tokio::test]
async fn test_sub_resources() {
    let registry = load_registry();

    let body =
        json_body(send(&registry, MockRequest::new(Method::GET, "/targets/1/subs/1")).await).await;
    assert_eq!(body, json!({"code": 3, "message": "sub"}));

    let body = json_body(
        send(
            &registry,
            MockRequest::new(Method::GET, "/targets/1/subs/1/sub-subs/1"),
        )
        .await,
    )
    .await;
    assert_eq!(body, json!({"code": 4, "message": "sub-sub"}));

    let body = json_body(
        send(&registry, MockRequest::new(Method::GET, "/targets/1/any-subs/9")).await,
    )
    .await;
    assert_eq!(body, json!({"code": 4, "message": "any-sub"}));
}

#[tokio::test]
async fn test_sub_resource_requires_parent_id() {
    let registry = load_registry();

    let response = send(&registry, MockRequest::new(Method::GET, "/targets/2/subs/1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&registry, MockRequest::new(Method::GET, "/targets/1/subs/2")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&registry, MockRequest::new(Method::GET, "/targets/1/sub/1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collection_get() {
    let registry = load_registry();

    let response = send(&registry, MockRequest::new(Method::GET, "/all-resources")).await;
    let body = json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_collection_and_instance_do_not_mix() {
    let registry = load_registry();

    // POST is configured for the collection only
    let response = send(&registry, MockRequest::new(Method::POST, "/targets/1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // GET is configured for instances only
    let response = send(&registry, MockRequest::new(Method::GET, "/targets")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unknown id
    let response = send(&registry, MockRequest::new(Method::GET, "/targets/3")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_route_table_order() {
    let table = Config::from_file(fixture("rest.json"))
        .unwrap()
        .compile()
        .unwrap();
    let routes: Vec<String> = table.routes().iter().map(ToString::to_string).collect();

    assert_eq!(
        routes,
        vec![
            "GET /targets/1",
            "GET /targets/2",
            "POST /targets",
            "PUT /targets/1",
            "DELETE /targets/1",
            "HEAD /targets/1",
            "PATCH /targets/1",
            "GET /targets/1/subs/1",
            "GET /targets/1/subs/1/sub-subs/1",
            "GET /targets/1/any-subs/*",
            "GET /all-resources",
            "HEAD /all-resources",
            "GET /any-targets/*",
            "GET /any-targets/*/any-subs/*",
        ]
    );
}

#[test]
fn test_compilation_is_deterministic() {
    let config = Config::from_file(fixture("rest.json")).unwrap();
    let first: RoutingTable = config.compile().unwrap();
    let second: RoutingTable = config.compile().unwrap();
    assert_eq!(first.to_string(), second.to_string());

    let request = MockRequest::new(Method::GET, "/any-targets/7/any-subs/8");
    assert_eq!(
        first.dispatch(&request).unwrap().index,
        second.dispatch(&request).unwrap().index
    );
}

#[test]
fn test_params_bound_per_resource() {
    let table = Config::from_file(fixture("rest.json"))
        .unwrap()
        .compile()
        .unwrap();
    let request = MockRequest::new(Method::GET, "/any-targets/7/any-subs/8");
    let selected = table.dispatch(&request).unwrap();

    assert_eq!(selected.params.get("any-targets"), Some("7"));
    assert_eq!(selected.params.get("any-subs"), Some("8"));
}

#[test]
fn test_missing_response_rejects_configuration() {
    let config = Config::from_file(fixture("rest_without_response.json")).unwrap();

    match config.compile() {
        Err(ConfigError::Configuration(err)) => assert_eq!(
            err,
            ConfigurationError::MissingResponse {
                path: "/targets".to_string(),
                method: HttpMethod::Get,
                index: 1,
            }
        ),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(table) => panic!("expected failure, compiled {} routes", table.len()),
    }
}
