//! Configuration management for the gateway
//!
//! Values come from a config file (TOML/YAML/JSON, located by `CONFIG_PATH`)
//! layered over built-in defaults. Secrets are never read from the file:
//! `JWT_SIGNING_KEY` is taken from the environment only.

use crate::backend::ServiceName;
use crate::directive::DirectiveSpec;
use crate::error::Result;
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::debug;

/// Config file used when `CONFIG_PATH` is not set
pub const DEFAULT_CONFIG_PATH: &str = "configs/main";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Backend service endpoints
    pub service: ServiceConfig,
    /// Auth secrets (environment only)
    #[serde(skip)]
    pub auth: AuthConfig,
    /// Backend channel tuning
    pub client: ClientConfig,
    /// Logging and metrics
    pub telemetry: TelemetryConfig,
    /// Pre-conditions attached to unified API operations
    #[serde(rename = "directive")]
    pub directives: Vec<DirectiveSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Budget for all backend calls made on behalf of one request
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            name: "durudex-gateway".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// TLS settings of one backend channel
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub enable: bool,
    #[serde(rename = "ca-cert")]
    pub ca_cert: String,
    pub cert: String,
    pub key: String,
}

/// Address of one backend service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceAddrConfig {
    pub addr: String,
    pub tls: TlsConfig,
}

impl ServiceAddrConfig {
    fn local(port: u16) -> Self {
        Self {
            addr: format!("localhost:{}", port),
            tls: TlsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub auth: ServiceAddrConfig,
    pub code: ServiceAddrConfig,
    pub user: ServiceAddrConfig,
    pub post: ServiceAddrConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auth: ServiceAddrConfig::local(8001),
            code: ServiceAddrConfig::local(8003),
            user: ServiceAddrConfig::local(8004),
            post: ServiceAddrConfig::local(8005),
        }
    }
}

impl ServiceConfig {
    pub fn get(&self, name: ServiceName) -> &ServiceAddrConfig {
        match name {
            ServiceName::Auth => &self.auth,
            ServiceName::Code => &self.code,
            ServiceName::User => &self.user,
            ServiceName::Post => &self.post,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
}

#[derive(Clone, Default)]
pub struct JwtConfig {
    pub signing_key: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

/// Backend channel tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub connect_timeout_secs: u64,
    pub keep_alive_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            keep_alive_secs: 30,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// "pretty" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from `CONFIG_PATH` and the environment
    pub fn from_env() -> Result<Self> {
        let path = env::var("CONFIG_PATH")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let signing_key = env::var("JWT_SIGNING_KEY").ok();

        Self::load(Path::new(&path), signing_key)
    }

    /// Load configuration from a file, applying the signing key secret
    ///
    /// The file must exist; its extension may be omitted.
    pub fn load(path: &Path, signing_key: Option<String>) -> Result<Self> {
        debug!("Parsing config file: {}", path.display());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&path.to_string_lossy()).required(true))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.auth.jwt.signing_key = signing_key.unwrap_or_default();

        Ok(config)
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
