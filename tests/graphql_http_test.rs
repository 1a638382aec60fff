//! HTTP surface: /graphql, /health, /ready, /metrics

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{get_json, post_json, send, test_router, TestAuthBackend, TestCodeBackend};
use durudex_gateway::directive::{ArgValue, DirectiveSpec};
use durudex_gateway::operation::Operation;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

fn fakes() -> (Arc<TestAuthBackend>, Arc<TestCodeBackend>) {
    (
        Arc::new(TestAuthBackend::new()),
        Arc::new(TestCodeBackend::accepting("a@b.com", 123456)),
    )
}

const SIGN_UP: &str = r#"
    mutation SignUp($input: SignUpInput!) {
        signUp(input: $input) { id }
    }
"#;

fn sign_up_variables() -> Value {
    json!({
        "input": {
            "username": "alice",
            "name": "Alice",
            "email": "a@b.com",
            "password": "hunter22",
            "birthday": "1999-05-17T00:00:00Z",
            "sex": "F"
        }
    })
}

#[tokio::test]
async fn test_health() {
    let (auth, code) = fakes();
    let app = test_router(&auth, &code, &[]);

    let (status, body): (_, Option<Value>) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["status"], "healthy");
}

#[tokio::test]
async fn test_ready_lists_services() {
    let (auth, code) = fakes();
    let app = test_router(&auth, &code, &[]);

    let (status, body): (_, Option<Value>) = get_json(&app, "/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.unwrap()["services"],
        json!(["auth", "code", "user", "post"])
    );
}

#[tokio::test]
async fn test_metrics_disabled_returns_not_found() {
    let (auth, code) = fakes();
    let app = test_router(&auth, &code, &[]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sign_up_over_http() {
    let (auth, code) = fakes();
    let app = test_router(&auth, &code, &[]);

    let (status, body): (_, Option<Value>) = post_json(
        &app,
        "/graphql",
        &json!({ "query": SIGN_UP, "variables": sign_up_variables() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["data"], json!({ "signUp": { "id": "123" } }));
    assert!(body.get("errors").is_none());
    assert_eq!(auth.calls(), 1);
}

#[tokio::test]
async fn test_wrong_code_over_http() {
    let (auth, code) = fakes();
    let guard = DirectiveSpec::new(Operation::SignUp, "emailCode")
        .arg("email", ArgValue::input("email"))
        .arg("code", ArgValue::literal(111111));
    let app = test_router(&auth, &code, &[guard]);

    let (status, body): (_, Option<Value>) = post_json(
        &app,
        "/graphql",
        &json!({ "query": SIGN_UP, "variables": sign_up_variables() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["data"], json!({ "signUp": { "id": "" } }));
    assert_eq!(body["errors"][0]["message"], "Wrong code");
    assert_eq!(
        body["errors"][0]["extensions"]["code"],
        "VERIFICATION_FAILED"
    );
    assert_eq!(code.calls(), 1);
    assert_eq!(auth.calls(), 0);
}

#[tokio::test]
async fn test_get_code_not_sent_over_http() {
    let (_, code) = fakes();
    let auth = Arc::new(TestAuthBackend {
        code_sent: false,
        ..TestAuthBackend::new()
    });
    let app = test_router(&auth, &code, &[]);

    let (_, body): (_, Option<Value>) = post_json(
        &app,
        "/graphql",
        &json!({
            "query": r#"mutation { getCode(input: { email: "a@b.com", name: "A" }) { status } }"#
        }),
    )
    .await;

    let body = body.unwrap();
    assert_eq!(body["data"], json!({ "getCode": { "status": false } }));
    assert_eq!(body["errors"][0]["extensions"]["code"], "INTERNAL");
}

#[tokio::test]
async fn test_request_id_header_is_forwarded() {
    let (auth, code) = fakes();
    let app = test_router(&auth, &code, &[]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/graphql")
        .header("Content-Type", "application/json")
        .header("x-request-id", "req-from-client")
        .body(Body::from(
            json!({ "query": SIGN_UP, "variables": sign_up_variables() }).to_string(),
        ))
        .unwrap();

    let (status, _): (_, Option<Value>) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        auth.last_request_id.lock().unwrap().as_deref(),
        Some("req-from-client")
    );
}

#[tokio::test]
async fn test_graphiql_page() {
    let (auth, code) = fakes();
    let app = test_router(&auth, &code, &[]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/graphql")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("graphiql"));
}

#[tokio::test]
async fn test_invalid_input_is_a_graphql_error() {
    let (auth, code) = fakes();
    let app = test_router(&auth, &code, &[]);

    let (status, body): (_, Option<Value>) = post_json(
        &app,
        "/graphql",
        &json!({ "query": "mutation { signIn(input: { username: \"a\" }) { accessToken } }" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap()["errors"].as_array().is_some_and(|e| !e.is_empty()));
    assert_eq!(auth.calls(), 0);
}
