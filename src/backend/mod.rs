//! Backend service access
//!
//! Resolvers and directives only see the [`AuthBackend`] and [`CodeBackend`]
//! capabilities. The gRPC implementations live in [`auth`] and [`code`] and
//! are built on the channels owned by the [`ServiceClientPool`].

pub mod auth;
pub mod code;
pub mod pool;
pub mod registry;

use crate::context::RequestContext;
use crate::grpc::proto::gateway::{
    GetCodeRequest, GetCodeResponse, RefreshTokensRequest, RefreshTokensResponse, SignInRequest,
    SignInResponse, SignUpRequest, SignUpResponse,
};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tonic::Status;

pub use auth::GrpcAuthBackend;
pub use code::GrpcCodeBackend;
pub use pool::{BackendClient, ServiceClientPool};
pub use registry::{ServiceEndpoint, ServiceEndpointRegistry, TlsPolicy};

/// Backend services the gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceName {
    Auth,
    Code,
    User,
    Post,
}

impl ServiceName {
    pub const ALL: [ServiceName; 4] = [
        ServiceName::Auth,
        ServiceName::Code,
        ServiceName::User,
        ServiceName::Post,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Auth => "auth",
            ServiceName::Code => "code",
            ServiceName::User => "user",
            ServiceName::Post => "post",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ServiceName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown service '{}'", s))
    }
}

/// Remote operations of the auth service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
#[allow(clippy::result_large_err)]
pub trait AuthBackend: Send + Sync {
    async fn sign_up(
        &self,
        ctx: &RequestContext,
        request: SignUpRequest,
    ) -> Result<SignUpResponse, Status>;

    async fn sign_in(
        &self,
        ctx: &RequestContext,
        request: SignInRequest,
    ) -> Result<SignInResponse, Status>;

    async fn refresh_tokens(
        &self,
        ctx: &RequestContext,
        request: RefreshTokensRequest,
    ) -> Result<RefreshTokensResponse, Status>;

    async fn get_code(
        &self,
        ctx: &RequestContext,
        request: GetCodeRequest,
    ) -> Result<GetCodeResponse, Status>;
}

/// Remote operations of the verification-code service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
#[allow(clippy::result_large_err)]
pub trait CodeBackend: Send + Sync {
    async fn check_by_email(
        &self,
        ctx: &RequestContext,
        email: &str,
        code: u64,
    ) -> Result<bool, Status>;
}

/// Record the outcome of one backend call
fn observe_call<T>(
    service: ServiceName,
    method: &'static str,
    started: Instant,
    result: &Result<T, Status>,
) {
    let status = match result {
        Ok(_) => {
            tracing::debug!(service = %service, method, "Backend call succeeded");
            "ok".to_string()
        }
        Err(status) => {
            tracing::warn!(
                service = %service,
                method,
                code = ?status.code(),
                "Backend call failed: {}",
                status.message()
            );
            format!("{:?}", status.code())
        }
    };

    counter!(
        "gateway_backend_calls_total",
        "service" => service.as_str(),
        "method" => method,
        "status" => status
    )
    .increment(1);
    histogram!(
        "gateway_backend_call_duration_seconds",
        "service" => service.as_str(),
        "method" => method
    )
    .record(started.elapsed().as_secs_f64());
}
