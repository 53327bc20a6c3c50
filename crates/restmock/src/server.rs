//! HTTP transport for the mock server.
//!
//! One task per connection serves HTTP/1.1 through `service_fn`. Every
//! request takes a snapshot of the active routing table, so a reload never
//! affects requests already being dispatched.

use crate::metrics::{self, OUTCOME_HANDLER_ERROR, OUTCOME_MATCHED, OUTCOME_NO_ROUTE};
use crate::request::MockRequest;
use crate::response::{build_response, error_response, MockResponse};
use crate::rest::RouteRegistry;
use anyhow::Context;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Bound mock server, ready to accept connections.
pub struct MockServer {
    listener: TcpListener,
    registry: Arc<RouteRegistry>,
    shutdown_tx: broadcast::Sender<()>,
}

impl MockServer {
    pub async fn bind(addr: SocketAddr, registry: Arc<RouteRegistry>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            listener,
            registry,
            shutdown_tx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn registry(&self) -> Arc<RouteRegistry> {
        Arc::clone(&self.registry)
    }

    /// Sender whose `send(())` stops the accept loop.
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Accept connections until a shutdown signal arrives.
    pub async fn run(self) {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let addr = self
            .listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_default();
        info!("Mock server listening on {}", addr);

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let registry = Arc::clone(&self.registry);
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| {
                                    let registry = Arc::clone(&registry);
                                    async move { handle_request(req, registry).await }
                                });
                                if let Err(e) = http1::Builder::new()
                                    .serve_connection(io, service)
                                    .await
                                {
                                    debug!("Connection error from {}: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error on {}: {}", addr, e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Mock server on {} shutting down", addr);
                    break;
                }
            }
        }
    }
}

/// Service function for one inbound request.
pub async fn handle_request(
    req: Request<Incoming>,
    registry: Arc<RouteRegistry>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            if bytes.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                "failed to read request body",
                Some(parts.method.as_str()),
                Some(parts.uri.path()),
            ));
        }
    };

    let request = MockRequest::from_parts(&parts, body);
    Ok(dispatch(&registry, &request).await)
}

/// Select a route for `request` and produce its response.
///
/// No route gives 404 and a failing handler gives 500, both with a JSON
/// error body.
pub async fn dispatch(registry: &RouteRegistry, request: &MockRequest) -> MockResponse {
    let table = registry.snapshot();
    let method = request.method.as_str();

    let started = Instant::now();
    let selected = table.dispatch(request);
    metrics::record_dispatch_duration(started.elapsed().as_secs_f64());

    let route_match = match selected {
        Ok(route_match) => route_match,
        Err(no_route) => {
            warn!("{}", no_route);
            metrics::record_request(method, OUTCOME_NO_ROUTE);
            return error_response(
                StatusCode::NOT_FOUND,
                &no_route.to_string(),
                Some(method),
                Some(&request.path),
            );
        }
    };

    let route = route_match.route.to_string();
    debug!(
        "{} {} matched route #{} ({})",
        method, request.path, route_match.index, route
    );
    metrics::record_route_hit(&route);

    match route_match.respond(request).await {
        Ok(response) => {
            metrics::record_request(method, OUTCOME_MATCHED);
            response
        }
        Err(e) => {
            warn!("Handler for route #{} failed: {}", route_match.index, e);
            metrics::record_request(method, OUTCOME_HANDLER_ERROR);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                Some(method),
                Some(&request.path),
            )
        }
    }
}

/// Serve the Prometheus text exposition on `GET /metrics` until shutdown.
pub async fn serve_metrics(
    addr: SocketAddr,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", addr))?;
    info!("Metrics endpoint listening on http://{}/metrics", addr);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        tokio::spawn(async move {
                            let io = TokioIo::new(stream);
                            let service = service_fn(|req: Request<Incoming>| async move {
                                let response = metrics_response(req.method(), req.uri().path());
                                Ok::<_, Infallible>(response)
                            });
                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                debug!("Metrics connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => error!("Metrics accept error: {}", e),
                }
            }
            _ = shutdown_rx.recv() => {
                debug!("Metrics endpoint shutting down");
                return Ok(());
            }
        }
    }
}

fn metrics_response(method: &Method, path: &str) -> MockResponse {
    if method == Method::GET && path == "/metrics" {
        let mut response = build_response(StatusCode::OK, metrics::collect_metrics());
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        );
        response
    } else {
        error_response(StatusCode::NOT_FOUND, "not found", Some(method.as_str()), Some(path))
    }
}

/// Rebuild the routing table from `config_path` on every SIGHUP.
#[cfg(unix)]
pub fn spawn_reload_on_sighup(
    registry: Arc<RouteRegistry>,
    config_path: std::path::PathBuf,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = hangup.recv() => {
                    info!("SIGHUP received, reloading {}", config_path.display());
                    // Errors are logged by the registry and the old table stays active
                    let _ = registry.reload_with(|| crate::config::load_table(&config_path));
                }
                _ = shutdown_rx.recv() => break,
            }
        }
    }))
}
