use anyhow::Result;
use durudex_gateway::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let prometheus = telemetry::init(&config.telemetry)?;

    info!("Starting {} v{}", config.server.name, env!("CARGO_PKG_VERSION"));
    if config.auth.jwt.signing_key.is_empty() {
        info!("JWT_SIGNING_KEY not set");
    }

    server::run(config, prometheus).await
}
