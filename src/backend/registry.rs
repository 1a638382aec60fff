//! Resolved backend endpoints

use super::ServiceName;
use crate::config::{ServiceConfig, TlsConfig};
use crate::error::{AppError, Result};
use std::collections::BTreeMap;

/// TLS settings for one backend channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsPolicy {
    pub enabled: bool,
    pub ca_cert_path: String,
    pub cert_path: String,
    pub key_path: String,
}

impl From<&TlsConfig> for TlsPolicy {
    fn from(tls: &TlsConfig) -> Self {
        Self {
            enabled: tls.enable,
            ca_cert_path: tls.ca_cert.clone(),
            cert_path: tls.cert.clone(),
            key_path: tls.key.clone(),
        }
    }
}

/// Address and TLS policy of one backend service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub name: ServiceName,
    pub address: String,
    pub tls: TlsPolicy,
}

impl ServiceEndpoint {
    /// Reject settings that would not open the channel exactly as configured
    ///
    /// An explicit scheme must agree with the TLS policy, and a TLS channel
    /// needs a CA to validate the backend against.
    pub fn validate(&self) -> Result<()> {
        if self.address.is_empty() {
            return Err(AppError::Configuration(format!(
                "service.{}.addr is empty",
                self.name
            )));
        }

        if let Some((scheme, _)) = self.address.split_once("://") {
            let expected = if self.tls.enabled { "https" } else { "http" };
            if !scheme.eq_ignore_ascii_case(expected) {
                return Err(AppError::Configuration(format!(
                    "service.{}.addr uses {}:// but tls.enable is {}",
                    self.name, scheme, self.tls.enabled
                )));
            }
        }

        if self.tls.enabled && self.tls.ca_cert_path.is_empty() {
            return Err(AppError::Configuration(format!(
                "service.{}.tls.ca-cert is required when tls.enable is true",
                self.name
            )));
        }

        Ok(())
    }

    /// URI used to open the channel (`http://` or `https://` by TLS policy)
    pub fn uri(&self) -> String {
        if self.address.contains("://") {
            return self.address.clone();
        }
        let scheme = if self.tls.enabled { "https" } else { "http" };
        format!("{}://{}", scheme, self.address)
    }

    /// Host part of the address, used as the TLS server name
    pub fn host(&self) -> &str {
        let without_scheme = self
            .address
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.address);
        let authority = without_scheme.split('/').next().unwrap_or(without_scheme);
        match authority.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
            _ => authority,
        }
    }
}

/// Endpoints for every backend service, fixed at startup
#[derive(Debug, Clone)]
pub struct ServiceEndpointRegistry {
    endpoints: BTreeMap<ServiceName, ServiceEndpoint>,
}

impl ServiceEndpointRegistry {
    pub fn from_config(config: &ServiceConfig) -> Self {
        let endpoints = ServiceName::ALL
            .into_iter()
            .map(|name| {
                let service = config.get(name);
                let endpoint = ServiceEndpoint {
                    name,
                    address: service.addr.trim().to_string(),
                    tls: TlsPolicy::from(&service.tls),
                };
                (name, endpoint)
            })
            .collect();

        Self { endpoints }
    }

    /// Look up the endpoint of a service by name
    pub fn resolve(&self, name: &str) -> Result<&ServiceEndpoint> {
        let service = name
            .parse::<ServiceName>()
            .map_err(AppError::Configuration)?;
        self.endpoint(service)
    }

    /// Look up the endpoint of a known service
    pub fn endpoint(&self, name: ServiceName) -> Result<&ServiceEndpoint> {
        let endpoint = self.endpoints.get(&name).ok_or_else(|| {
            AppError::Configuration(format!("no endpoint configured for {} service", name))
        })?;
        endpoint.validate()?;
        Ok(endpoint)
    }
}
