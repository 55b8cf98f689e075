// src/server/handler.rs
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Service;

use crate::metrics::MetricsRegistry;
use crate::monitor::{Monitor, RequestContext};

/// Lets the server tell a per-connection handler who it is talking to.
pub trait WithPeer {
    fn with_peer(self, peer: SocketAddr) -> Self;
}

/// Serves the status report as JSON on a single path.
#[derive(Clone)]
pub struct RequestHandler {
    monitor: Arc<Monitor>,
    path: Arc<str>,
    peer: Option<SocketAddr>,
}

impl RequestHandler {
    pub fn new(monitor: Arc<Monitor>, path: impl Into<Arc<str>>) -> Self {
        Self {
            monitor,
            path: path.into(),
            peer: None,
        }
    }
}

impl WithPeer for RequestHandler {
    fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let monitor = self.monitor.clone();
        let path = self.path.clone();
        let peer = self.peer;

        Box::pin(async move {
            if req.uri().path() != &*path {
                return Ok(plain(StatusCode::NOT_FOUND, "Not Found"));
            }
            if req.method() != Method::GET {
                return Ok(plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"));
            }

            let mut context = RequestContext::new().with_path(req.uri().path());
            if let Some(peer) = peer {
                context = context.with_remote_addr(peer);
            }

            let report = monitor.check(&context).await;
            let status = if report.status.is_ok() {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };

            match serde_json::to_vec(&report) {
                Ok(body) => Ok(respond(status, "application/json", Body::from(body))),
                Err(e) => {
                    tracing::error!(%e, "failed to render status report");
                    Ok(plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
                }
            }
        })
    }
}

/// Serves Prometheus text on a single path.
#[derive(Clone)]
pub struct MetricsHandler {
    registry: Arc<MetricsRegistry>,
    path: Arc<str>,
}

impl MetricsHandler {
    pub fn new(registry: Arc<MetricsRegistry>, path: impl Into<Arc<str>>) -> Self {
        Self {
            registry,
            path: path.into(),
        }
    }
}

impl WithPeer for MetricsHandler {
    fn with_peer(self, _peer: SocketAddr) -> Self {
        self
    }
}

impl Service<Request<Body>> for MetricsHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let response = if req.uri().path() != &*self.path {
            plain(StatusCode::NOT_FOUND, "Not Found")
        } else {
            match self.registry.gather() {
                Ok(metrics) => respond(
                    StatusCode::OK,
                    "text/plain; version=0.0.4",
                    Body::from(metrics),
                ),
                Err(e) => {
                    tracing::error!(%e, "failed to encode metrics");
                    plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                }
            }
        };
        futures::future::ready(Ok(response))
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn plain(status: StatusCode, message: &'static str) -> Response<Body> {
    respond(status, "text/plain", Body::from(message))
}
