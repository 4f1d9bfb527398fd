// ==================================
// tests/integration/auth_flow_tests.rs
// ==================================
//! Registration, login and logout through the full router
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use backend_lib::auth::TokenCodec;
use backend_lib::storage::Storage;
use backend_lib::validation::{
    INVALID_CREDENTIALS, PASSWORD_TOO_SHORT, USERNAME_INVALID_CHARS, USERNAME_REQUIRED,
    USERNAME_TAKEN, USERNAME_TOO_SHORT,
};

use crate::test_utils::{TestApp, TEST_SECRET};

#[tokio::test]
async fn test_register_signs_in_and_shows_dashboard() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/register",
            None,
            &[("username", "alice"), ("password", "hunter22")],
        )
        .await;
    response.assert_redirect("/");

    let set_cookie = response.set_cookie().unwrap();
    assert!(set_cookie.starts_with("blog_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Max-Age=3600"));

    let cookie = response.session_cookie().unwrap();
    let dashboard = app.get("/", Some(&cookie)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.view(), "dashboard");
    assert_eq!(dashboard.json["user"]["username"], "alice");
    assert_eq!(dashboard.json["posts"], serde_json::json!([]));
}

#[tokio::test]
async fn test_anonymous_home_is_landing_page() {
    let app = TestApp::new();
    let response = app.get("/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.view(), "homepage");
    assert!(response.json["user"].is_null());
    assert!(response.errors().is_empty());
}

#[tokio::test]
async fn test_register_collects_every_error() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/register",
            None,
            &[("username", "a!"), ("password", "abc")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.view(), "homepage");
    assert!(response.set_cookie().is_none());
    assert_eq!(
        response.errors(),
        vec![USERNAME_TOO_SHORT, USERNAME_INVALID_CHARS, PASSWORD_TOO_SHORT]
    );
}

#[tokio::test]
async fn test_register_without_form_body_reports_missing_fields() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username":"alice"}"#))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.errors().first().map(String::as_str), Some(USERNAME_REQUIRED));
    assert!(app
        .state
        .storage
        .find_user_by_username("alice")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_registration_keeps_original_user() {
    let app = TestApp::new();
    let cookie = app.register("alice", "hunter22").await;
    let original = app
        .state
        .storage
        .find_user_by_username("alice")
        .await
        .unwrap()
        .unwrap();

    let response = app
        .post_form(
            "/register",
            None,
            &[("username", "alice"), ("password", "different1")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.errors(), vec![USERNAME_TAKEN]);
    assert!(response.set_cookie().is_none());

    let stored = app
        .state
        .storage
        .find_user_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.password_hash, original.password_hash);

    // The first session is unaffected
    assert_eq!(app.get("/", Some(&cookie)).await.view(), "dashboard");
}

#[tokio::test]
async fn test_login_with_registered_credentials() {
    let app = TestApp::new();
    app.register("alice", "hunter22").await;

    let response = app
        .post_form(
            "/login",
            None,
            &[("username", "alice"), ("password", "hunter22")],
        )
        .await;
    response.assert_redirect("/");

    let cookie = response.session_cookie().unwrap();
    let dashboard = app.get("/", Some(&cookie)).await;
    assert_eq!(dashboard.json["user"]["username"], "alice");
}

#[tokio::test]
async fn test_login_wrong_password_is_generic() {
    let app = TestApp::new();
    app.register("alice", "hunter22").await;

    let response = app
        .post_form(
            "/login",
            None,
            &[("username", "alice"), ("password", "hunter23")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.view(), "login");
    assert_eq!(response.errors(), vec![INVALID_CREDENTIALS]);
    assert!(response.set_cookie().is_none());
}

#[tokio::test]
async fn test_login_unknown_user_is_generic() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/login",
            None,
            &[("username", "ghost"), ("password", "whatever")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.errors(), vec![INVALID_CREDENTIALS]);
    assert!(response.set_cookie().is_none());
}

#[tokio::test]
async fn test_login_with_invalid_fields_is_generic() {
    let app = TestApp::new();

    let response = app
        .post_form("/login", None, &[("username", ""), ("password", "")])
        .await;
    assert_eq!(response.errors(), vec![INVALID_CREDENTIALS]);

    let response = app
        .post_form(
            "/login",
            None,
            &[("username", "al"), ("password", "short")],
        )
        .await;
    assert_eq!(response.errors(), vec![INVALID_CREDENTIALS]);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();
    let cookie = app.register("alice", "hunter22").await;

    let response = app.get("/logout", Some(&cookie)).await;
    response.assert_redirect("/");
    assert!(response.clears_cookie());

    // Logging out with no session still succeeds
    let response = app.get("/logout", None).await;
    response.assert_redirect("/");
    assert!(response.clears_cookie());
}

#[tokio::test]
async fn test_login_page_ends_current_session() {
    let app = TestApp::new();
    let cookie = app.register("alice", "hunter22").await;

    let response = app.get("/login", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.view(), "login");
    assert!(response.json["user"].is_null());
    assert!(response.clears_cookie());

    let response = app.get("/login", None).await;
    assert_eq!(response.view(), "login");
    assert!(response.set_cookie().is_none());
}

#[tokio::test]
async fn test_expired_session_is_anonymous() {
    let app = TestApp::new();
    app.register("alice", "hunter22").await;
    let alice = app
        .state
        .storage
        .find_user_by_username("alice")
        .await
        .unwrap()
        .unwrap();

    let codec = TokenCodec::new(TEST_SECRET.as_bytes(), 3600);
    let expired = codec.issue_with_ttl(alice.id, "alice", -1).unwrap();
    let cookie = format!("blog_session={expired}");

    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.view(), "homepage");
    assert!(response.json["user"].is_null());

    let response = app.get("/create-post", Some(&cookie)).await;
    response.assert_redirect("/");
}

#[tokio::test]
async fn test_forged_session_is_anonymous() {
    let app = TestApp::new();
    let codec = TokenCodec::new(b"another-secret-another-secret-another", 3600);
    let forged = codec.issue(1, "alice").unwrap();

    let response = app
        .get("/", Some(&format!("blog_session={forged}")))
        .await;
    assert_eq!(response.view(), "homepage");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_with_form_metacharacters_round_trips() {
    let app = TestApp::new();
    let password = "p&ss=w%rd+ 1;é";
    app.register("alice", password).await;

    let response = app
        .post_form(
            "/login",
            None,
            &[("username", "alice"), ("password", password)],
        )
        .await;
    response.assert_redirect("/");
    assert!(response.session_cookie().is_some());
}
