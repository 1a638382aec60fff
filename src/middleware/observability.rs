//! Request IDs and HTTP metrics as a single Tower layer

use crate::context::REQUEST_ID_METADATA;
use axum::{
    body::Body,
    http::{HeaderValue, Request},
    response::Response,
};
use metrics::{counter, gauge, histogram};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Routes reported under their own label; everything else is `other`
const KNOWN_ROUTES: [&str; 4] = ["/graphql", "/health", "/ready", "/metrics"];

#[derive(Clone, Default)]
pub struct ObservabilityLayer;

impl<S> Layer<S> for ObservabilityLayer {
    type Service = ObservabilityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ObservabilityMiddleware { inner }
    }
}

/// Ensures every request carries `x-request-id` and records HTTP metrics
#[derive(Clone)]
pub struct ObservabilityMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for ObservabilityMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let method = request.method().to_string();
        let route = route_label(request.uri().path());
        let request_id = ensure_request_id(&mut request);

        gauge!("gateway_http_requests_in_flight").increment(1.0);
        let start = Instant::now();

        let mut inner = self.inner.clone();
        let span = tracing::info_span!("request", request_id = %request_id);

        Box::pin(
            async move {
                let result = inner.call(request).await;
                gauge!("gateway_http_requests_in_flight").decrement(1.0);
                let mut response = result?;

                let status = response.status().as_u16().to_string();
                counter!(
                    "gateway_http_requests_total",
                    "method" => method.clone(),
                    "route" => route,
                    "status" => status
                )
                .increment(1);
                histogram!(
                    "gateway_http_request_duration_seconds",
                    "method" => method,
                    "route" => route
                )
                .record(start.elapsed().as_secs_f64());

                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    response.headers_mut().insert(REQUEST_ID_METADATA, value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Read the inbound request ID, generating and attaching one when absent
fn ensure_request_id(request: &mut Request<Body>) -> String {
    let existing = request
        .headers()
        .get(REQUEST_ID_METADATA)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    if let Some(id) = existing {
        return id;
    }

    let id = Uuid::new_v4().to_string();
    if let Ok(value) = HeaderValue::from_str(&id) {
        request.headers_mut().insert(REQUEST_ID_METADATA, value);
    }
    id
}

fn route_label(path: &str) -> &'static str {
    KNOWN_ROUTES
        .into_iter()
        .find(|route| *route == path)
        .unwrap_or("other")
}
