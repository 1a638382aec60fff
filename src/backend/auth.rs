//! gRPC implementation of [`AuthBackend`]

use super::{observe_call, AuthBackend, ServiceName};
use crate::context::RequestContext;
use crate::grpc::proto::gateway::{
    GetCodeRequest, GetCodeResponse, RefreshTokensRequest, RefreshTokensResponse, SignInRequest,
    SignInResponse, SignUpRequest, SignUpResponse,
};
use crate::grpc::AuthServiceClient;
use async_trait::async_trait;
use std::time::Instant;
use tonic::transport::Channel;
use tonic::Status;

/// Auth service client backed by the pooled channel
#[derive(Debug, Clone)]
pub struct GrpcAuthBackend {
    client: AuthServiceClient<Channel>,
}

impl GrpcAuthBackend {
    pub fn new(client: AuthServiceClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthBackend for GrpcAuthBackend {
    async fn sign_up(
        &self,
        ctx: &RequestContext,
        request: SignUpRequest,
    ) -> Result<SignUpResponse, Status> {
        let mut client = self.client.clone();
        let started = Instant::now();
        let result = ctx
            .run(client.sign_up(ctx.grpc_request(request)))
            .await
            .map(|r| r.into_inner());
        observe_call(ServiceName::Auth, "SignUp", started, &result);
        result
    }

    async fn sign_in(
        &self,
        ctx: &RequestContext,
        request: SignInRequest,
    ) -> Result<SignInResponse, Status> {
        let mut client = self.client.clone();
        let started = Instant::now();
        let result = ctx
            .run(client.sign_in(ctx.grpc_request(request)))
            .await
            .map(|r| r.into_inner());
        observe_call(ServiceName::Auth, "SignIn", started, &result);
        result
    }

    async fn refresh_tokens(
        &self,
        ctx: &RequestContext,
        request: RefreshTokensRequest,
    ) -> Result<RefreshTokensResponse, Status> {
        let mut client = self.client.clone();
        let started = Instant::now();
        let result = ctx
            .run(client.refresh_tokens(ctx.grpc_request(request)))
            .await
            .map(|r| r.into_inner());
        observe_call(ServiceName::Auth, "RefreshTokens", started, &result);
        result
    }

    async fn get_code(
        &self,
        ctx: &RequestContext,
        request: GetCodeRequest,
    ) -> Result<GetCodeResponse, Status> {
        let mut client = self.client.clone();
        let started = Instant::now();
        let result = ctx
            .run(client.get_code(ctx.grpc_request(request)))
            .await
            .map(|r| r.into_inner());
        observe_call(ServiceName::Auth, "GetCode", started, &result);
        result
    }
}
