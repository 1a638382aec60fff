//! gRPC implementation of [`CodeBackend`]

use super::{observe_call, CodeBackend, ServiceName};
use crate::context::RequestContext;
use crate::grpc::proto::gateway::CheckByEmailRequest;
use crate::grpc::CodeServiceClient;
use async_trait::async_trait;
use std::time::Instant;
use tonic::transport::Channel;
use tonic::Status;

/// Verification-code service client backed by the pooled channel
#[derive(Debug, Clone)]
pub struct GrpcCodeBackend {
    client: CodeServiceClient<Channel>,
}

impl GrpcCodeBackend {
    pub fn new(client: CodeServiceClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CodeBackend for GrpcCodeBackend {
    async fn check_by_email(
        &self,
        ctx: &RequestContext,
        email: &str,
        code: u64,
    ) -> Result<bool, Status> {
        let mut client = self.client.clone();
        let request = CheckByEmailRequest {
            email: email.to_string(),
            code,
        };

        let started = Instant::now();
        let result = ctx
            .run(client.check_by_email(ctx.grpc_request(request)))
            .await
            .map(|r| r.into_inner().status);
        observe_call(ServiceName::Code, "CheckByEmail", started, &result);
        result
    }
}
