//! `/graphql`: unified API endpoint and GraphiQL page

use crate::context::{RequestContext, REQUEST_ID_METADATA};
use crate::server::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
    Json,
};
use std::time::Duration;
use uuid::Uuid;

/// POST /graphql
pub async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let request_id = headers
        .get(REQUEST_ID_METADATA)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let ctx = RequestContext::new(request_id).with_timeout(Duration::from_secs(
        state.config.server.request_timeout_secs,
    ));

    Json(state.schema.execute(request.data(ctx)).await)
}

/// GET /graphql
pub async fn graphiql() -> impl IntoResponse {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}
