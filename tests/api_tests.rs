//! HTTP-level tests for the security pipeline.
//!
//! Tests cover:
//! - Public paths reachable without a token
//! - Fail-closed default for every other path (401)
//! - Expired / foreign-key / malformed tokens behave like no token
//! - 403 for authenticated callers lacking a role
//! - Ignored operational paths bypass security entirely
//! - signup → authenticate → authenticated call round trip

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, Utc};
use jwt_gateway::{AppState, Config, build_router, build_state, services::auth::TokenCodec};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: [u8; 64] = [0x5a; 64];

fn test_config() -> Config {
    let map = HashMap::from([
        ("JWT_SECRET".to_string(), STANDARD.encode(SECRET)),
        ("JWT_TOKEN_VALIDITY_SECONDS".to_string(), "3600".to_string()),
        ("BCRYPT_COST".to_string(), "4".to_string()),
        ("SEED_ADMIN_USERNAME".to_string(), "admin".to_string()),
        ("SEED_ADMIN_PASSWORD".to_string(), "admin-pass".to_string()),
    ]);
    Config::from_lookup(|key| map.get(key).cloned()).expect("valid test config")
}

/// Create a test app and return (router, state).
async fn create_test_app() -> (Router, AppState) {
    let config = test_config();
    let state = build_state(&config).await.expect("state builds");
    (build_router(state.clone(), &config), state)
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

async fn get(app: &Router, uri: &str, auth: Option<&str>) -> Response {
    let mut req = Request::builder().method("GET").uri(uri);
    if let Some(value) = auth {
        req = req.header(header::AUTHORIZATION, value);
    }
    app.clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_public_paths_do_not_require_token() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/api/hello", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"hello");

    // permit-all: failures here are validation/credential errors, never the entry point
    let response = post_json(&app, "/api/signup", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/authenticate",
        json!({"username": "nobody", "password": "x"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_public_paths_ignore_bad_tokens() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/api/hello", Some("Bearer not.a.token")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_paths_fail_closed_without_token() {
    let (app, _) = create_test_app().await;

    for uri in ["/api/profile", "/api/user", "/api/user/admin", "/", "/api/unknown"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED", "{uri}");
    }
}

#[tokio::test]
async fn test_slash_variants_of_public_paths_fail_closed() {
    let (app, state) = create_test_app().await;

    for uri in ["/api/hello/", "//api/hello"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    // with an identity they fall through to the router, which has no such route
    let issued = state.codec.issue("alice", ["USER"], 3600).unwrap();
    let response = get(&app, "/api/hello/", Some(&bearer(&issued.token))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_rejects_password_past_bcrypt_limit() {
    let (app, _) = create_test_app().await;
    let long = "a".repeat(72);

    let response = post_json(
        &app,
        "/api/signup",
        json!({"username": "dave", "password": format!("{long}X"), "nickname": "Dave"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/signup",
        json!({"username": "dave", "password": long, "nickname": "Dave"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        &app,
        "/api/authenticate",
        json!({"username": "dave", "password": format!("{long}Y")}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_alice_profile_scenario() {
    let (app, state) = create_test_app().await;
    let issued = state.codec.issue("alice", ["USER"], 3600).unwrap();

    // valid token -> 200 with identity alice
    let response = get(&app, "/api/profile", Some(&bearer(&issued.token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["subject"], "alice");
    assert_eq!(body["roles"], json!(["USER"]));

    // no header -> 401
    let response = get(&app, "/api/profile", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // signed by a different key -> 401
    let foreign = TokenCodec::new(&[0x11; 64], 3600)
        .issue("alice", ["USER"], 3600)
        .unwrap();
    let response = get(&app, "/api/profile", Some(&bearer(&foreign.token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let (app, state) = create_test_app().await;
    let issued = state
        .codec
        .issue_at("alice", ["USER"], 60, Utc::now() - Duration::hours(2))
        .unwrap();

    let response = get(&app, "/api/profile", Some(&bearer(&issued.token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_role_is_forbidden_not_unauthorized() {
    let (app, state) = create_test_app().await;
    let user = state.codec.issue("bob", ["ROLE_USER"], 3600).unwrap();

    let response = get(&app, "/api/user/admin", Some(&bearer(&user.token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert!(!body.to_string().contains("ROLE_ADMIN"));
}

#[tokio::test]
async fn test_admin_can_look_up_users() {
    let (app, _) = create_test_app().await;

    let response = post_json(
        &app,
        "/api/authenticate",
        json!({"username": "admin", "password": "admin-pass"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get(&app, "/api/user/admin", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "admin");
    assert_eq!(body["authorities"], json!(["ROLE_ADMIN", "ROLE_USER"]));

    let response = get(&app, "/api/user/ghost", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_authenticate_round_trip() {
    let (app, _) = create_test_app().await;

    let response = post_json(
        &app,
        "/api/signup",
        json!({"username": "carol", "password": "carol-pw", "nickname": "Carol"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = body_json(response).await;
    assert_eq!(body["username"], "carol");
    assert_eq!(body["authorities"], json!(["ROLE_USER"]));
    assert!(body.get("password").is_none());

    let response = post_json(
        &app,
        "/api/signup",
        json!({"username": "carol", "password": "other-pw", "nickname": "Carol2"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        &app,
        "/api/authenticate",
        json!({"username": "carol", "password": "wrong"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        &app,
        "/api/authenticate",
        json!({"username": "carol", "password": "carol-pw"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let header_value = response.headers()[header::AUTHORIZATION]
        .to_str()
        .unwrap()
        .to_string();
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(header_value, bearer(&token));

    let response = get(&app, "/api/user", Some(&header_value)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "carol");
    assert_eq!(body["nickname"], "Carol");
}

#[tokio::test]
async fn test_authenticated_unknown_path_is_not_found() {
    let (app, state) = create_test_app().await;
    let issued = state.codec.issue("alice", ["USER"], 3600).unwrap();

    let response = get(&app, "/api/unknown", Some(&bearer(&issued.token))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ignored_paths_bypass_security() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/favicon.ico", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // no console is served, but the request is never challenged
    let response = get(&app, "/h2-console/login.do", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/authenticate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/api/hello", None).await;
    let headers = response.headers();
    assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    assert_eq!(headers[header::CONTENT_SECURITY_POLICY], "frame-ancestors 'self'");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert!(headers.get("x-request-id").is_some());
    assert!(headers.get(header::SET_COOKIE).is_none());
}
