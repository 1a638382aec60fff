//! Operation dispatch through directives, resolvers and the error translator

use chrono::{TimeZone, Utc};
use common::{gateway, TestAuthBackend, TestCodeBackend};
use durudex_gateway::context::RequestContext;
use durudex_gateway::directive::{ArgValue, DirectiveSpec};
use durudex_gateway::error::ErrorClass;
use durudex_gateway::model::{
    GetCodeInput, RefreshTokensInput, SignInInput, SignUp, SignUpInput, Status, VerifyInput,
};
use durudex_gateway::operation::Operation;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tonic::Status as GrpcStatus;

mod common;

fn ctx() -> RequestContext {
    RequestContext::new("req-test")
}

fn sign_up_input() -> SignUpInput {
    SignUpInput {
        username: "alice".to_string(),
        name: "Alice".to_string(),
        email: "a@b.com".to_string(),
        password: "hunter22".to_string(),
        birthday: Utc.with_ymd_and_hms(1999, 5, 17, 0, 0, 0).unwrap(),
        sex: "F".to_string(),
    }
}

fn email_code(operation: Operation, code: u64) -> DirectiveSpec {
    DirectiveSpec::new(operation, "emailCode")
        .arg("email", ArgValue::input("email"))
        .arg("code", ArgValue::literal(code))
}

#[tokio::test]
async fn test_sign_up_returns_backend_id() {
    let auth = Arc::new(TestAuthBackend::new());
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 123456));
    let gateway = gateway(&auth, &code, &[]);

    let outcome = gateway.sign_up(&ctx(), sign_up_input()).await;

    assert_eq!(outcome.data, SignUp { id: "123".to_string() });
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn test_get_code_not_sent() {
    let auth = Arc::new(TestAuthBackend {
        code_sent: false,
        ..TestAuthBackend::new()
    });
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 123456));
    let gateway = gateway(&auth, &code, &[]);

    let outcome = gateway
        .get_code(
            &ctx(),
            GetCodeInput {
                email: "a@b.com".to_string(),
                name: "A".to_string(),
            },
        )
        .await;

    assert_eq!(outcome.data, Status { status: false });
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn test_wrong_code_never_reaches_backend() {
    let auth = Arc::new(TestAuthBackend::new());
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 654321));
    let gateway = gateway(&auth, &code, &[email_code(Operation::SignUp, 123456)]);

    let outcome = gateway.sign_up(&ctx(), sign_up_input()).await;

    let err = outcome.error.expect("directive rejects the request");
    assert_eq!(err.message, "Wrong code");
    assert_eq!(err.classification, ErrorClass::VerificationFailed);
    assert_eq!(outcome.data, SignUp::default());
    assert_eq!(code.calls(), 1);
    assert_eq!(auth.calls(), 0);
}

#[tokio::test]
async fn test_valid_code_lets_operation_through() {
    let auth = Arc::new(TestAuthBackend::new());
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 123456));
    let gateway = gateway(&auth, &code, &[email_code(Operation::SignUp, 123456)]);

    let outcome = gateway.sign_up(&ctx(), sign_up_input()).await;

    assert!(outcome.is_success());
    assert_eq!(code.calls(), 1);
    assert_eq!(auth.calls(), 1);
}

#[tokio::test]
async fn test_code_service_failure_surfaces_unmodified() {
    let auth = Arc::new(TestAuthBackend::new());
    let code = Arc::new(TestCodeBackend::failing(GrpcStatus::unavailable(
        "code service unavailable",
    )));
    let gateway = gateway(&auth, &code, &[email_code(Operation::SignUp, 123456)]);

    let outcome = gateway.sign_up(&ctx(), sign_up_input()).await;

    let err = outcome.error.unwrap();
    assert_eq!(err.message, "code service unavailable");
    assert_eq!(err.classification, ErrorClass::Internal);
    assert_eq!(auth.calls(), 0);
}

#[tokio::test]
async fn test_each_operation_makes_one_backend_call() {
    let auth = Arc::new(TestAuthBackend::new());
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 123456));
    let gateway = gateway(&auth, &code, &[]);

    gateway.sign_up(&ctx(), sign_up_input()).await;
    assert_eq!(auth.calls(), 1);

    gateway
        .sign_in(
            &ctx(),
            SignInInput {
                username: "alice".to_string(),
                password: "hunter22".to_string(),
            },
        )
        .await;
    assert_eq!(auth.calls(), 2);

    gateway
        .refresh_tokens(
            &ctx(),
            RefreshTokensInput {
                refresh_token: "r".to_string(),
            },
        )
        .await;
    assert_eq!(auth.calls(), 3);

    gateway
        .get_code(
            &ctx(),
            GetCodeInput {
                email: "a@b.com".to_string(),
                name: "A".to_string(),
            },
        )
        .await;
    assert_eq!(auth.calls(), 4);
    assert_eq!(code.calls(), 0);
}

#[tokio::test]
async fn test_verify_calls_no_backend() {
    let auth = Arc::new(TestAuthBackend::new());
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 123456));
    let gateway = gateway(&auth, &code, &[]);

    let outcome = gateway
        .verify(
            &ctx(),
            VerifyInput {
                email: "a@b.com".to_string(),
                code: 123456,
            },
        )
        .await;

    assert_eq!(outcome.data, Status { status: false });
    assert!(outcome.error.is_none());
    assert_eq!(auth.calls(), 0);
    assert_eq!(code.calls(), 0);
}

#[tokio::test]
async fn test_backend_error_classification() {
    let auth = Arc::new(TestAuthBackend::failing(GrpcStatus::not_found(
        "user not found",
    )));
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 123456));
    let gateway = gateway(&auth, &code, &[]);

    let outcome = gateway.sign_in(&ctx(), SignInInput::default()).await;

    let err = outcome.error.unwrap();
    assert_eq!(err.classification, ErrorClass::NotFound);
    assert_eq!(err.message, "user not found");
    assert_eq!(outcome.data.access_token, "");
}

#[tokio::test]
async fn test_request_context_reaches_backend() {
    let auth = Arc::new(TestAuthBackend::new());
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 123456));
    let gateway = gateway(&auth, &code, &[]);

    gateway.sign_up(&ctx(), sign_up_input()).await;

    assert_eq!(
        auth.last_request_id.lock().unwrap().as_deref(),
        Some("req-test")
    );
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let auth = Arc::new(TestAuthBackend::new());
    let code = Arc::new(TestCodeBackend::accepting("a@b.com", 123456));
    let guard = DirectiveSpec::new(Operation::SignIn, "emailCode")
        .arg("email", ArgValue::literal("a@b.com"))
        .arg("code", ArgValue::literal(123456));
    let gateway = Arc::new(gateway(&auth, &code, &[guard]));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let gateway = gateway.clone();
            tokio::spawn(async move {
                let outcome = gateway
                    .sign_in(
                        &RequestContext::new(format!("req-{}", i)),
                        SignInInput {
                            username: format!("user{}", i),
                            password: "pw".to_string(),
                        },
                    )
                    .await;
                (i, outcome)
            })
        })
        .collect();

    for handle in handles {
        let (i, outcome) = handle.await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.data.access_token, format!("access-user{}", i));
    }
    assert_eq!(auth.calls(), 16);
    assert_eq!(code.calls(), 16);
}
