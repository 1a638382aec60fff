//! Persistent backend channels
//!
//! Every backend gets exactly one channel, opened eagerly when the gateway
//! starts. Handles given out by the pool are clones of that channel, so no
//! request path ever dials a backend itself.

use super::registry::{ServiceEndpoint, ServiceEndpointRegistry, TlsPolicy};
use super::ServiceName;
use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::grpc::{AuthServiceClient, CodeServiceClient};
use std::collections::BTreeMap;
use std::time::Duration;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use tracing::info;

/// Shared, concurrency-safe handle bound to one backend endpoint
#[derive(Debug, Clone)]
pub struct BackendClient {
    name: ServiceName,
    channel: Channel,
}

impl BackendClient {
    pub fn name(&self) -> ServiceName {
        self.name
    }

    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }
}

/// One connection per backend service for the lifetime of the process
#[derive(Debug, Clone)]
pub struct ServiceClientPool {
    clients: BTreeMap<ServiceName, BackendClient>,
}

impl ServiceClientPool {
    /// Connect to every backend in the registry
    ///
    /// Fails on the first endpoint that cannot be resolved or reached; the
    /// gateway must not serve requests with a backend missing.
    pub async fn connect(registry: &ServiceEndpointRegistry, config: &ClientConfig) -> Result<Self> {
        let mut clients = BTreeMap::new();

        for name in ServiceName::ALL {
            let endpoint = registry.endpoint(name)?;
            let channel = connect_endpoint(endpoint, config).await?;
            info!(
                "Connected to {} service at {} (tls: {})",
                name, endpoint.address, endpoint.tls.enabled
            );
            clients.insert(name, BackendClient { name, channel });
        }

        Ok(Self { clients })
    }

    /// Handle for the named backend
    pub fn get(&self, name: ServiceName) -> Result<BackendClient> {
        self.clients.get(&name).cloned().ok_or_else(|| {
            AppError::Configuration(format!("{} service is not connected", name))
        })
    }

    /// Names of the connected backends
    pub fn services(&self) -> Vec<ServiceName> {
        self.clients.keys().copied().collect()
    }

    pub fn auth(&self) -> Result<AuthServiceClient<Channel>> {
        Ok(AuthServiceClient::new(self.get(ServiceName::Auth)?.channel()))
    }

    pub fn code(&self) -> Result<CodeServiceClient<Channel>> {
        Ok(CodeServiceClient::new(self.get(ServiceName::Code)?.channel()))
    }
}

async fn connect_endpoint(endpoint: &ServiceEndpoint, config: &ClientConfig) -> Result<Channel> {
    let mut builder = Endpoint::from_shared(endpoint.uri())
        .map_err(|e| {
            AppError::Configuration(format!(
                "invalid address '{}' for {} service: {}",
                endpoint.address, endpoint.name, e
            ))
        })?
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .tcp_keepalive(Some(Duration::from_secs(config.keep_alive_secs)));

    if endpoint.tls.enabled {
        let tls = load_tls_config(&endpoint.tls, endpoint.host()).await?;
        builder = builder.tls_config(tls).map_err(|e| {
            AppError::Configuration(format!(
                "invalid TLS settings for {} service: {}",
                endpoint.name, e
            ))
        })?;
    }

    builder
        .connect()
        .await
        .map_err(|source| AppError::Connection {
            service: endpoint.name,
            address: endpoint.address.clone(),
            source,
        })
}

/// Build client TLS settings: trust the configured CA, present the client pair
async fn load_tls_config(policy: &TlsPolicy, domain: &str) -> Result<ClientTlsConfig> {
    if policy.cert_path.is_empty() != policy.key_path.is_empty() {
        return Err(AppError::Configuration(
            "TLS client certificate and key must be configured together".to_string(),
        ));
    }

    let ca = read_pem(&policy.ca_cert_path).await?;
    let mut tls = ClientTlsConfig::new()
        .domain_name(domain.to_string())
        .ca_certificate(Certificate::from_pem(ca));

    if !policy.cert_path.is_empty() {
        let cert = read_pem(&policy.cert_path).await?;
        let key = read_pem(&policy.key_path).await?;
        tls = tls.identity(Identity::from_pem(cert, key));
    }

    Ok(tls)
}

async fn read_pem(path: &str) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Configuration(format!("failed to read '{}': {}", path, e)))
}
