//! Request span for `TraceLayer` with GraphQL variables kept out of the logs
//!
//! GET requests to `/graphql` carry the operation in the query string, and
//! `variables` routinely hold passwords and refresh tokens.

use crate::context::REQUEST_ID_METADATA;
use axum::http::{Request, Uri};
use tower_http::trace::MakeSpan;
use tracing::Span;

/// Query parameters whose values are never logged
const REDACTED_PARAMS: &[&str] = &["variables", "extensions", "password", "refresh_token", "code"];

#[derive(Clone, Debug, Default)]
pub struct SanitizedMakeSpan;

impl<B> MakeSpan<B> for SanitizedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(REQUEST_ID_METADATA)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "http",
            method = %request.method(),
            uri = %sanitize_uri(request.uri()),
            request_id = %request_id,
        )
    }
}

fn sanitize_uri(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _))
                if REDACTED_PARAMS
                    .iter()
                    .any(|p| key.eq_ignore_ascii_case(p)) =>
            {
                format!("{key}=[REDACTED]")
            }
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", uri.path(), pairs.join("&"))
}
