//! Per-request context forwarded to every backend call

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tonic::Status;

/// Metadata key carrying the inbound request ID to the backends
pub const REQUEST_ID_METADATA: &str = "x-request-id";

/// Request-scoped data shared by directives and resolvers
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID (propagated from the `x-request-id` header)
    pub request_id: String,
    /// Point in time after which backend calls are abandoned
    pub deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline: None,
        }
    }

    /// Bound every backend call made for this request by `timeout` from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Time left before the deadline, if one is set
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Wrap a backend message in a gRPC request carrying this context
    pub fn grpc_request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        if let Some(remaining) = self.remaining() {
            request.set_timeout(remaining);
        }
        if let Ok(value) = self.request_id.parse() {
            request.metadata_mut().insert(REQUEST_ID_METADATA, value);
        }
        request
    }

    /// Drive a backend call, giving up once the deadline passes
    pub async fn run<T, F>(&self, call: F) -> Result<T, Status>
    where
        F: Future<Output = Result<T, Status>>,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, call)
                .await
                .map_err(|_| Status::deadline_exceeded("request deadline exceeded"))?,
            None => call.await,
        }
    }
}
