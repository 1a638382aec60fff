//! Server initialization and routing

use crate::api;
use crate::backend::{ServiceClientPool, ServiceEndpointRegistry, ServiceName};
use crate::config::Config;
use crate::gateway::Gateway;
use crate::graphql::{build_schema, GatewaySchema};
use crate::middleware::{ObservabilityLayer, SanitizedMakeSpan};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub schema: GatewaySchema,
    /// Backends connected at startup
    pub services: Vec<ServiceName>,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: Config,
        gateway: Gateway,
        services: Vec<ServiceName>,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            schema: build_schema(Arc::new(gateway)),
            services,
            prometheus,
        }
    }
}

/// Connect to every backend, then serve the unified API until shutdown
pub async fn run(config: Config, prometheus: Option<PrometheusHandle>) -> Result<()> {
    let registry = ServiceEndpointRegistry::from_config(&config.service);
    let pool = ServiceClientPool::connect(&registry, &config.client).await?;
    info!("Connected to {} backend services", pool.services().len());

    let gateway = Gateway::from_pool(&pool, &config.directives)?;
    let http_addr = config.http_addr();
    let state = AppState::new(config, gateway, pool.services(), prometheus);

    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready))
        .route("/metrics", get(api::metrics::metrics_handler))
        .route(
            "/graphql",
            post(api::graphql::execute).get(api::graphql::graphiql),
        )
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(ObservabilityLayer)
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
