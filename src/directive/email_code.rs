//! `emailCode(email, code)`: require a valid verification code

use super::{Continue, Directive, DirectiveArgs};
use crate::backend::CodeBackend;
use crate::context::RequestContext;
use crate::error::{translate, GatewayError};
use async_trait::async_trait;
use std::sync::Arc;

/// Message returned when the code service rejects the code
pub const WRONG_CODE: &str = "Wrong code";

/// Checks `email`/`code` against the verification-code service
pub struct EmailCodeDirective {
    code: Arc<dyn CodeBackend>,
}

impl EmailCodeDirective {
    pub const NAME: &'static str = "emailCode";

    pub fn new(code: Arc<dyn CodeBackend>) -> Self {
        Self { code }
    }
}

#[async_trait]
impl Directive for EmailCodeDirective {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn check(
        &self,
        args: &DirectiveArgs,
        ctx: &RequestContext,
    ) -> Result<Continue, GatewayError> {
        let email = args.string("email")?;
        let code = args.unsigned("code")?;

        let valid = self
            .code
            .check_by_email(ctx, email, code)
            .await
            .map_err(|status| translate(&status))?;

        if !valid {
            return Err(GatewayError::verification_failed(WRONG_CODE));
        }

        Ok(Continue)
    }
}
