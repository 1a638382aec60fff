//! Common test utilities: counting fake backends and HTTP helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use durudex_gateway::backend::{AuthBackend, CodeBackend, ServiceName};
use durudex_gateway::config::Config;
use durudex_gateway::context::RequestContext;
use durudex_gateway::directive::DirectiveSpec;
use durudex_gateway::grpc::proto::gateway::{
    GetCodeRequest, GetCodeResponse, RefreshTokensRequest, RefreshTokensResponse, SignInRequest,
    SignInResponse, SignUpRequest, SignUpResponse,
};
use durudex_gateway::server::{build_router, AppState};
use durudex_gateway::Gateway;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tonic::Status;
use tower::ServiceExt;

/// Auth service fake that counts calls and remembers the last request ID
#[derive(Default)]
pub struct TestAuthBackend {
    pub calls: AtomicU32,
    pub sign_up_id: String,
    pub code_sent: bool,
    pub failure: Option<Status>,
    pub last_request_id: Mutex<Option<String>>,
}

impl TestAuthBackend {
    pub fn new() -> Self {
        Self {
            sign_up_id: "123".to_string(),
            code_sent: true,
            ..Default::default()
        }
    }

    pub fn failing(status: Status) -> Self {
        Self {
            failure: Some(status),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, ctx: &RequestContext) -> Result<(), Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request_id.lock().unwrap() = Some(ctx.request_id.clone());
        match &self.failure {
            Some(status) => Err(status.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthBackend for TestAuthBackend {
    async fn sign_up(
        &self,
        ctx: &RequestContext,
        _request: SignUpRequest,
    ) -> Result<SignUpResponse, Status> {
        self.record(ctx)?;
        Ok(SignUpResponse {
            id: self.sign_up_id.clone(),
        })
    }

    async fn sign_in(
        &self,
        ctx: &RequestContext,
        request: SignInRequest,
    ) -> Result<SignInResponse, Status> {
        self.record(ctx)?;
        Ok(SignInResponse {
            access_token: format!("access-{}", request.username),
            refresh_token: format!("refresh-{}", request.username),
        })
    }

    async fn refresh_tokens(
        &self,
        ctx: &RequestContext,
        request: RefreshTokensRequest,
    ) -> Result<RefreshTokensResponse, Status> {
        self.record(ctx)?;
        Ok(RefreshTokensResponse {
            access_token: "new-access".to_string(),
            refresh_token: format!("{}-rotated", request.refresh_token),
        })
    }

    async fn get_code(
        &self,
        ctx: &RequestContext,
        _request: GetCodeRequest,
    ) -> Result<GetCodeResponse, Status> {
        self.record(ctx)?;
        Ok(GetCodeResponse {
            status: self.code_sent,
        })
    }
}

/// Code service fake accepting exactly one email/code pair
pub struct TestCodeBackend {
    pub calls: AtomicU32,
    pub email: String,
    pub code: u64,
    pub failure: Option<Status>,
}

impl TestCodeBackend {
    pub fn accepting(email: &str, code: u64) -> Self {
        Self {
            calls: AtomicU32::new(0),
            email: email.to_string(),
            code,
            failure: None,
        }
    }

    pub fn failing(status: Status) -> Self {
        Self {
            failure: Some(status),
            ..Self::accepting("", 0)
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeBackend for TestCodeBackend {
    async fn check_by_email(
        &self,
        _ctx: &RequestContext,
        email: &str,
        code: u64,
    ) -> Result<bool, Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = &self.failure {
            return Err(status.clone());
        }
        Ok(email == self.email && code == self.code)
    }
}

pub fn gateway(
    auth: &Arc<TestAuthBackend>,
    code: &Arc<TestCodeBackend>,
    specs: &[DirectiveSpec],
) -> Gateway {
    Gateway::build(auth.clone(), code.clone(), specs).expect("gateway builds")
}

/// Router wired to the fakes, without a metrics recorder
pub fn test_router(
    auth: &Arc<TestAuthBackend>,
    code: &Arc<TestCodeBackend>,
    specs: &[DirectiveSpec],
) -> Router {
    let state = AppState::new(
        Config::default(),
        gateway(auth, code, specs),
        ServiceName::ALL.to_vec(),
        None,
    );
    build_router(state)
}

pub async fn get_json<T: DeserializeOwned>(app: &Router, path: &str) -> (StatusCode, Option<T>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

pub async fn post_json<T: Serialize, R: DeserializeOwned>(
    app: &Router,
    path: &str,
    body: &T,
) -> (StatusCode, Option<R>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap();

    send(app, request).await
}

pub async fn send<R: DeserializeOwned>(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, Option<R>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    if body_bytes.is_empty() {
        return (status, None);
    }

    match serde_json::from_slice(&body_bytes) {
        Ok(data) => (status, Some(data)),
        Err(_) => (status, None),
    }
}
