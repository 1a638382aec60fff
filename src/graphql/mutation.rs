use crate::context::RequestContext;
use crate::gateway::Gateway;
use crate::model::{
    GetCodeInput, RefreshTokens, RefreshTokensInput, SignIn, SignInInput, SignUp, SignUpInput,
    Status, VerifyInput,
};
use crate::resolver::Outcome;
use async_graphql::{Context, ErrorExtensions, Object, Result as GqlResult};
use std::sync::Arc;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn sign_up(&self, ctx: &Context<'_>, input: SignUpInput) -> GqlResult<SignUp> {
        let (gateway, request) = scope(ctx)?;
        respond(ctx, gateway.sign_up(&request, input).await)
    }

    async fn sign_in(&self, ctx: &Context<'_>, input: SignInInput) -> GqlResult<SignIn> {
        let (gateway, request) = scope(ctx)?;
        respond(ctx, gateway.sign_in(&request, input).await)
    }

    async fn refresh_tokens(
        &self,
        ctx: &Context<'_>,
        input: RefreshTokensInput,
    ) -> GqlResult<RefreshTokens> {
        let (gateway, request) = scope(ctx)?;
        respond(ctx, gateway.refresh_tokens(&request, input).await)
    }

    async fn verify(&self, ctx: &Context<'_>, input: VerifyInput) -> GqlResult<Status> {
        let (gateway, request) = scope(ctx)?;
        respond(ctx, gateway.verify(&request, input).await)
    }

    async fn get_code(&self, ctx: &Context<'_>, input: GetCodeInput) -> GqlResult<Status> {
        let (gateway, request) = scope(ctx)?;
        respond(ctx, gateway.get_code(&request, input).await)
    }
}

fn scope<'a>(ctx: &Context<'a>) -> GqlResult<(&'a Arc<Gateway>, RequestContext)> {
    let gateway = ctx.data::<Arc<Gateway>>()?;
    let request = ctx
        .data_opt::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| RequestContext::new(uuid::Uuid::new_v4().to_string()));
    Ok((gateway, request))
}

/// Return the data and report the error, if any, on the response's error list
fn respond<T>(ctx: &Context<'_>, outcome: Outcome<T>) -> GqlResult<T> {
    if let Some(error) = outcome.error {
        let error = error.extend().into_server_error(ctx.item.pos);
        ctx.add_error(ctx.set_error_path(error));
    }
    Ok(outcome.data)
}
