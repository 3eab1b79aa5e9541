//! Integration tests for the authentication flow.

mod helpers;

use http::StatusCode;
use serde_json::json;

use neoterik_database::UserRepository;

const EMAIL: &str = "a@x.com";
const PASSWORD: &str = "secret123";

async fn register(app: &helpers::TestApp) -> helpers::TestResponse {
    app.request(
        "POST",
        "/auth/register",
        Some(json!({ "email": EMAIL, "password": PASSWORD, "name": "Ada" })),
        None,
    )
    .await
}

async fn login(app: &helpers::TestApp, email: &str, password: &str) -> helpers::TestResponse {
    app.request(
        "POST",
        "/auth/login",
        Some(json!({ "email": email, "password": password })),
        None,
    )
    .await
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let app = helpers::TestApp::new();

    // Register
    let response = register(&app).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["email"], EMAIL);
    assert_eq!(response.body["name"], "Ada");
    assert!(response.body.get("createdAt").is_some());
    assert!(response.body.get("passwordHash").is_none());
    assert!(response.set_cookie().is_none());

    let stored = app.users.find_by_email(EMAIL).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, PASSWORD);

    // Duplicate register
    let response = register(&app).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");

    // Login
    let response = login(&app, EMAIL, PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert_eq!(response.body["user"]["email"], EMAIL);

    let set_cookie = response.set_cookie().expect("login must set a cookie");
    assert!(set_cookie.starts_with("auth-session="));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("Secure"));
    let cookie = response.cookie_pair().unwrap();

    // Session
    let response = app
        .request("GET", "/auth/session", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], true);
    assert_eq!(response.body["user"]["email"], EMAIL);
    assert_eq!(response.body["user"]["id"], stored.id.to_string());

    // Logout
    let response = app
        .request("POST", "/auth/logout", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logged out");
    let removal = response.set_cookie().expect("logout must clear the cookie");
    assert!(removal.starts_with("auth-session=;"));
    assert!(removal.contains("Max-Age=0"));

    // Session after logout, with the cookie the browser now holds
    let cleared = response.cookie_pair().unwrap();
    let response = app
        .request("GET", "/auth/session", None, Some(&cleared))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], false);
    assert!(response.body["user"].is_null());
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = helpers::TestApp::new();

    for body in [
        json!({}),
        json!({ "email": EMAIL }),
        json!({ "password": PASSWORD }),
        json!({ "email": "   ", "password": PASSWORD }),
    ] {
        let response = app.request("POST", "/auth/register", Some(body), None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "MISSING_FIELD");
    }
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn test_register_normalizes_email() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({ "email": "  A@X.com ", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["email"], EMAIL);
    assert!(response.body["name"].is_null());

    let response = register(&app).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_failures_look_identical() {
    let app = helpers::TestApp::new();
    register(&app).await;

    let wrong_password = login(&app, EMAIL, "wrong-password").await;
    let unknown_email = login(&app, "nobody@x.com", PASSWORD).await;
    let missing = app
        .request("POST", "/auth/login", Some(json!({})), None)
        .await;

    for response in [&wrong_password, &unknown_email, &missing] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.set_cookie().is_none());
    }
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body, missing.body);
}

#[tokio::test]
async fn test_login_with_unreadable_body_is_unauthorized() {
    let app = helpers::TestApp::new();
    register(&app).await;

    let wrong_password = login(&app, EMAIL, "wrong-password").await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);

    for (content_type, body) in [
        (None, ""),
        (Some("application/json"), ""),
        (Some("application/json"), "{not json"),
        (Some("application/json"), r#"{"email":1}"#),
        (Some("application/json"), r#"{"email":"a@x.com","password":["secret123"]}"#),
        (Some("text/plain"), r#"{"email":"a@x.com","password":"secret123"}"#),
    ] {
        let response = app
            .raw_request("POST", "/auth/login", content_type, body, None)
            .await;
        assert_eq!(
            response.status,
            StatusCode::UNAUTHORIZED,
            "body {body:?} with content type {content_type:?}"
        );
        assert_eq!(response.body, wrong_password.body);
        assert!(response.set_cookie().is_none());
    }
}

#[tokio::test]
async fn test_session_without_cookie() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/auth/session", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], false);
    assert!(response.body["user"].is_null());
}

#[tokio::test]
async fn test_session_with_forged_cookie() {
    let app = helpers::TestApp::new();
    register(&app).await;
    let cookie = login(&app, EMAIL, PASSWORD).await.cookie_pair().unwrap();

    let mut forged = cookie.clone();
    forged.pop();
    forged.push(if cookie.ends_with('A') { 'B' } else { 'A' });

    let response = app
        .request("GET", "/auth/session", None, Some(&forged))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], false);

    let response = app
        .request("GET", "/auth/session", None, Some("auth-session=garbage"))
        .await;
    assert_eq!(response.body["authenticated"], false);
}

#[tokio::test]
async fn test_session_for_deleted_user() {
    let app = helpers::TestApp::new();
    register(&app).await;
    let cookie = login(&app, EMAIL, PASSWORD).await.cookie_pair().unwrap();

    let user = app.users.find_by_email(EMAIL).await.unwrap().unwrap();
    assert!(app.users.remove(user.id));

    let response = app
        .request("GET", "/auth/session", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], false);
}

#[tokio::test]
async fn test_logout_without_session_still_clears() {
    let app = helpers::TestApp::new();

    let response = app.request("POST", "/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let removal = response.set_cookie().expect("logout must clear the cookie");
    assert!(removal.contains("Max-Age=0"));
}
