//! Unified API facade
//!
//! Every operation runs its directive chain first and only reaches the
//! resolver when the whole chain passed.

use crate::backend::{
    AuthBackend, CodeBackend, GrpcAuthBackend, GrpcCodeBackend, ServiceClientPool,
};
use crate::context::RequestContext;
use crate::directive::{DirectiveSet, DirectiveSpec, EmailCodeDirective, OperationTable};
use crate::error::Result;
use crate::model::{
    GetCodeInput, RefreshTokens, RefreshTokensInput, SignIn, SignInInput, SignUp, SignUpInput,
    Status, VerifyInput,
};
use crate::operation::Operation;
use crate::resolver::{AuthResolver, Outcome};
use std::sync::Arc;

pub struct Gateway {
    operations: OperationTable,
    auth: AuthResolver,
}

impl Gateway {
    pub fn new(operations: OperationTable, auth: AuthResolver) -> Self {
        Self { operations, auth }
    }

    /// Wire the gateway to backend capabilities and attach directives
    pub fn build(
        auth: Arc<dyn AuthBackend>,
        code: Arc<dyn CodeBackend>,
        specs: &[DirectiveSpec],
    ) -> Result<Self> {
        let directives = DirectiveSet::new().with(Arc::new(EmailCodeDirective::new(code)));
        let operations = OperationTable::build(specs, &directives)?;
        Ok(Self::new(operations, AuthResolver::new(auth)))
    }

    /// Wire the gateway to the pooled gRPC channels
    pub fn from_pool(pool: &ServiceClientPool, specs: &[DirectiveSpec]) -> Result<Self> {
        let auth = Arc::new(GrpcAuthBackend::new(pool.auth()?));
        let code = Arc::new(GrpcCodeBackend::new(pool.code()?));
        Self::build(auth, code, specs)
    }

    pub async fn sign_up(&self, ctx: &RequestContext, input: SignUpInput) -> Outcome<SignUp> {
        if let Err(e) = self.operations.check(Operation::SignUp, &input, ctx).await {
            return Outcome::failure(e);
        }
        self.auth.sign_up(ctx, input).await
    }

    pub async fn sign_in(&self, ctx: &RequestContext, input: SignInInput) -> Outcome<SignIn> {
        if let Err(e) = self.operations.check(Operation::SignIn, &input, ctx).await {
            return Outcome::failure(e);
        }
        self.auth.sign_in(ctx, input).await
    }

    pub async fn refresh_tokens(
        &self,
        ctx: &RequestContext,
        input: RefreshTokensInput,
    ) -> Outcome<RefreshTokens> {
        if let Err(e) = self
            .operations
            .check(Operation::RefreshTokens, &input, ctx)
            .await
        {
            return Outcome::failure(e);
        }
        self.auth.refresh_tokens(ctx, input).await
    }

    pub async fn verify(&self, ctx: &RequestContext, input: VerifyInput) -> Outcome<Status> {
        if let Err(e) = self.operations.check(Operation::Verify, &input, ctx).await {
            return Outcome::failure(e);
        }
        self.auth.verify(ctx, input).await
    }

    pub async fn get_code(&self, ctx: &RequestContext, input: GetCodeInput) -> Outcome<Status> {
        if let Err(e) = self.operations.check(Operation::GetCode, &input, ctx).await {
            return Outcome::failure(e);
        }
        self.auth.get_code(ctx, input).await
    }
}
