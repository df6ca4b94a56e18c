//! End-to-end login flow through the HTTP surface

mod common;

use axum::http::StatusCode;
use common::{create_test_server, login, redirect_target, state_from_redirect};
use oauth_portal::routes::session::SESSION_COOKIE;
use oauth_portal::UserStore;

/// Unauthenticated visitors are sent to the login page
#[tokio::test]
async fn test_unauthenticated_home_redirects_to_login() {
    let (server, _, _) = create_test_server();

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(redirect_target(&response), "/login");
}

/// /auth/provider redirects to the provider's authorization endpoint
/// with client id, scopes, and a fresh state value
#[tokio::test]
async fn test_begin_login_redirects_to_provider() {
    let (server, _, _) = create_test_server();

    let response = server.get("/auth/provider").await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let target = redirect_target(&response);
    assert!(target.starts_with("https://provider.example/authorize"));
    assert!(target.contains("client_id=mock-client"));
    assert!(target.contains("response_type=code"));
    assert!(!state_from_redirect(&response).is_empty());
}

/// Each handshake gets its own state value
#[tokio::test]
async fn test_state_is_fresh_per_handshake() {
    let (server, _, _) = create_test_server();

    let first = server.get("/auth/provider").await;
    let second = server.get("/auth/provider").await;

    assert_ne!(state_from_redirect(&first), state_from_redirect(&second));
}

/// Full flow: begin, callback, then the home route lands on the
/// dashboard with name and email URL-encoded in the query string
#[tokio::test]
async fn test_full_login_flow() {
    let (server, user_store, _) = create_test_server();

    let session_cookie = login(&server).await;
    assert!(!session_cookie.is_empty());

    let response = server
        .get("/")
        .add_cookie(cookie::Cookie::new(SESSION_COOKIE, session_cookie))
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        redirect_target(&response),
        "/dashboard?name=Ada+Lovelace&email=ada%40example.com"
    );

    // The login left exactly one durable record behind
    let user = user_store.get_user("ada@example.com").unwrap().unwrap();
    assert_eq!(user.name, "Ada Lovelace");
}

/// Logging in twice does not duplicate or overwrite the user record
#[tokio::test]
async fn test_repeat_login_keeps_single_record() {
    let (server, user_store, _) = create_test_server();

    login(&server).await;
    login(&server).await;

    let user = user_store.get_user("ada@example.com").unwrap().unwrap();
    assert_eq!(user.name, "Ada Lovelace");
}

/// Replaying a consumed state value fails the handshake
#[tokio::test]
async fn test_state_reuse_rejected() {
    let (server, _, _) = create_test_server();

    let response = server.get("/auth/provider").await;
    let state = state_from_redirect(&response);

    let response = server
        .get("/auth/provider/callback")
        .add_query_param("code", "good-code")
        .add_query_param("state", &state)
        .await;
    assert_eq!(redirect_target(&response), "/");

    // Same state again: rejected, no new session issued
    let response = server
        .get("/auth/provider/callback")
        .add_query_param("code", "good-code")
        .add_query_param("state", &state)
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(redirect_target(&response), "/login");
    assert!(response.maybe_cookie(SESSION_COOKIE).is_none());
}

/// A forged or corrupted session cookie reads as anonymous
#[tokio::test]
async fn test_tampered_cookie_is_anonymous() {
    let (server, _, _) = create_test_server();
    login(&server).await;

    let response = server
        .get("/")
        .add_cookie(cookie::Cookie::new(SESSION_COOKIE, "not-a-signed-value"))
        .await;

    assert_eq!(redirect_target(&response), "/login");
}

/// The login page itself is reachable without a session
#[tokio::test]
async fn test_login_page_is_public() {
    let (server, _, _) = create_test_server();

    let response = server.get("/login").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("/auth/provider"));
}
