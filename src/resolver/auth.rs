//! Auth operations: sign-up, sign-in, token refresh, verification codes

use super::Outcome;
use crate::backend::AuthBackend;
use crate::context::RequestContext;
use crate::error::{translate, GatewayError};
use crate::grpc::proto::gateway::{
    GetCodeRequest, RefreshTokensRequest, SignInRequest, SignUpRequest,
};
use crate::grpc::Timestamp;
use crate::model::{
    GetCodeInput, RefreshTokens, RefreshTokensInput, SignIn, SignInInput, SignUp, SignUpInput,
    Status, VerifyInput,
};
use std::sync::Arc;
use tracing::warn;

/// Reported when the auth service answers GetCode with `status = false`
pub const CODE_NOT_SENT: &str = "code was not sent";

/// Resolves auth operations against the auth service, one call each
#[derive(Clone)]
pub struct AuthResolver {
    auth: Arc<dyn AuthBackend>,
}

impl AuthResolver {
    pub fn new(auth: Arc<dyn AuthBackend>) -> Self {
        Self { auth }
    }

    pub async fn sign_up(&self, ctx: &RequestContext, input: SignUpInput) -> Outcome<SignUp> {
        let request = SignUpRequest {
            username: input.username,
            name: input.name,
            email: input.email,
            password: input.password,
            birthday: Some(Timestamp::from(input.birthday)),
            sex: input.sex,
        };

        self.auth
            .sign_up(ctx, request)
            .await
            .map(|response| SignUp { id: response.id })
            .map_err(|status| translate(&status))
            .into()
    }

    pub async fn sign_in(&self, ctx: &RequestContext, input: SignInInput) -> Outcome<SignIn> {
        let request = SignInRequest {
            username: input.username,
            password: input.password,
        };

        self.auth
            .sign_in(ctx, request)
            .await
            .map(|response| SignIn {
                access_token: response.access_token,
                refresh_token: response.refresh_token,
            })
            .map_err(|status| translate(&status))
            .into()
    }

    pub async fn refresh_tokens(
        &self,
        ctx: &RequestContext,
        input: RefreshTokensInput,
    ) -> Outcome<RefreshTokens> {
        let request = RefreshTokensRequest {
            refresh_token: input.refresh_token,
        };

        self.auth
            .refresh_tokens(ctx, request)
            .await
            .map(|response| RefreshTokens {
                access_token: response.access_token,
                refresh_token: response.refresh_token,
            })
            .map_err(|status| translate(&status))
            .into()
    }

    /// Verification is carried entirely by the operation's directives
    pub async fn verify(&self, _ctx: &RequestContext, _input: VerifyInput) -> Outcome<Status> {
        Outcome::success(Status { status: false })
    }

    pub async fn get_code(&self, ctx: &RequestContext, input: GetCodeInput) -> Outcome<Status> {
        let request = GetCodeRequest {
            email: input.email,
            name: input.name,
        };

        match self.auth.get_code(ctx, request).await {
            Ok(response) if response.status => Outcome::success(Status { status: true }),
            Ok(_) => {
                warn!(request_id = %ctx.request_id, "Auth service did not send the code");
                Outcome::partial(
                    Status { status: false },
                    GatewayError::internal(CODE_NOT_SENT),
                )
            }
            Err(status) => Outcome::failure(translate(&status)),
        }
    }
}
