// src/monitor/context.rs
use std::net::SocketAddr;
use uuid::Uuid;

/// Per-request data handed in by the transport layer. The monitor only uses
/// `request_id` for tracing; the rest is carried for the caller's benefit.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub remote_addr: Option<SocketAddr>,
    pub path: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            remote_addr: None,
            path: None,
        }
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
