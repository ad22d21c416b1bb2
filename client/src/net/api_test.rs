use axum::Router;
use axum::http::{HeaderMap, StatusCode as AxumStatus};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use serde_json::json;
use userdesk_server::config::ServerConfig;
use userdesk_server::state::AppState;

use super::*;
use crate::state::auth::Session;
use crate::test_helpers::temp_storage_dir;
use crate::util::auth::now_epoch_secs;
use crate::util::storage::LocalStorage;

// =============================================================================
// harness
// =============================================================================

async fn echo_auth(headers: HeaderMap) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    Json(json!({ "authorization": auth }))
}

async fn always_unauthorized() -> AxumStatus {
    AxumStatus::UNAUTHORIZED
}

async fn always_broken() -> AxumStatus {
    AxumStatus::INTERNAL_SERVER_ERROR
}

async fn no_content() -> AxumStatus {
    AxumStatus::NO_CONTENT
}

/// Login endpoint from the real server plus a stand-in users resource.
async fn spawn_backend() -> String {
    let downstream = Router::new()
        .route("/api/users", get(echo_auth).post(echo_auth))
        .route("/api/users/expired", get(always_unauthorized))
        .route("/api/users/broken", get(always_broken))
        .route("/api/users/1", axum::routing::delete(no_content));
    let app = userdesk_server::routes::app(AppState::from_config(&ServerConfig::default())).merge(downstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> ApiClient {
    let session = SessionStore::open(LocalStorage::open(temp_storage_dir()).unwrap());
    ApiClient::new(base_url, session, Duration::from_secs(5)).unwrap()
}

// =============================================================================
// helpers
// =============================================================================

#[test]
fn request_failed_message_formats_status() {
    assert_eq!(request_failed_message(500), "request failed: 500");
}

#[test]
fn login_error_maps_statuses() {
    assert!(matches!(login_error(StatusCode::BAD_REQUEST, "m".into()), ClientError::Validation(_)));
    assert!(matches!(login_error(StatusCode::UNAUTHORIZED, "m".into()), ClientError::Authentication(_)));
    assert!(matches!(login_error(StatusCode::BAD_GATEWAY, "m".into()), ClientError::Transport(_)));
}

#[test]
fn endpoint_joins_paths() {
    let client = client_for("http://example.test/");
    assert_eq!(client.endpoint("/api/login"), "http://example.test/api/login");
    assert_eq!(client.endpoint("api/users"), "http://example.test/api/users");
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_success_commits_session() {
    let client = client_for(&spawn_backend().await);
    let resp = client.login("academy@gmail.com", "academy123").await.unwrap();

    assert!(!resp.access_token.is_empty());
    assert_eq!(resp.token_type, "Bearer");
    let expected = now_epoch_secs() + 31_536_000;
    assert!((resp.expires_in - expected).abs() <= 5);

    let session = client.session().read();
    assert_eq!(session.token(), Some(resp.access_token.as_str()));
    assert_eq!(session.expires_at(), Some(resp.expires_in));
}

#[tokio::test]
async fn login_wrong_credentials_leaves_session_unchanged() {
    let client = client_for(&spawn_backend().await);
    client.session().commit("previous", 99).unwrap();

    let err = client.login("x@x.com", "wrong").await.unwrap_err();
    assert_eq!(err, ClientError::Authentication("Invalid Credentials!".into()));
    assert_eq!(err.redirect_target(), Some("/login"));
    assert_eq!(client.session().read(), Session::with_token("previous", 99));
}

#[tokio::test]
async fn login_empty_fields_fail_before_any_request() {
    let client = client_for(&dead_base_url().await);
    let err = client.login("", "").await.unwrap_err();
    assert_eq!(err, ClientError::Validation("Fill required fields.".into()));
    let err = client.login("academy@gmail.com", "").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn login_network_failure_is_transport_and_keeps_session() {
    let client = client_for(&dead_base_url().await);
    client.session().commit("previous", 7).unwrap();

    let err = client.login("academy@gmail.com", "academy123").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.user_message(), "Something went wrong.");
    assert_eq!(client.session().read(), Session::with_token("previous", 7));
}

#[tokio::test]
async fn logout_clears_session() {
    let client = client_for(&spawn_backend().await);
    client.login("academy@gmail.com", "academy123").await.unwrap();
    client.logout().unwrap();
    assert_eq!(client.session().read(), Session::empty());
}

#[tokio::test]
async fn ping_reports_health() {
    let client = client_for(&spawn_backend().await);
    client.ping().await.unwrap();
    let dead = client_for(&dead_base_url().await);
    assert!(matches!(dead.ping().await, Err(ClientError::Transport(_))));
}

// =============================================================================
// send_authorized
// =============================================================================

#[tokio::test]
async fn authorized_call_without_session_is_rejected_locally() {
    let client = client_for(&dead_base_url().await);
    let err = client
        .send_authorized(Method::GET, "/api/users", None)
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Authentication("Not signed in.".into()));
}

#[tokio::test]
async fn authorized_call_sends_bearer_token() {
    let client = client_for(&spawn_backend().await);
    let login = client.login("academy@gmail.com", "academy123").await.unwrap();

    let body = client
        .send_authorized(Method::GET, "/api/users", None)
        .await
        .unwrap();
    assert_eq!(body["authorization"], format!("Bearer {}", login.access_token));
}

#[tokio::test]
async fn authorized_call_forwards_json_body() {
    let client = client_for(&spawn_backend().await);
    client.session().commit("tok", 1).unwrap();
    let body = client
        .send_authorized(Method::POST, "/api/users", Some(&json!({ "firstName": "Ada" })))
        .await
        .unwrap();
    assert_eq!(body["authorization"], "Bearer tok");
}

#[tokio::test]
async fn downstream_unauthorized_clears_session() {
    let client = client_for(&spawn_backend().await);
    client.session().commit("revoked", 1).unwrap();

    let err = client
        .send_authorized(Method::GET, "/api/users/expired", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Authentication(_)));
    assert_eq!(err.redirect_target(), Some("/login"));
    assert_eq!(client.session().read(), Session::empty());
}

#[tokio::test]
async fn downstream_server_error_keeps_session() {
    let client = client_for(&spawn_backend().await);
    client.session().commit("tok", 1).unwrap();

    let err = client
        .send_authorized(Method::GET, "/api/users/broken", None)
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Transport("request failed: 500".into()));
    assert_eq!(client.session().read(), Session::with_token("tok", 1));
}

#[tokio::test]
async fn downstream_network_failure_keeps_session() {
    let client = client_for(&dead_base_url().await);
    client.session().commit("tok", 1).unwrap();
    let err = client
        .send_authorized(Method::GET, "/api/users", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(client.session().read().is_present());
}

#[tokio::test]
async fn empty_response_body_is_null() {
    let client = client_for(&spawn_backend().await);
    client.session().commit("tok", 1).unwrap();
    let body = client
        .send_authorized(Method::DELETE, "/api/users/1", None)
        .await
        .unwrap();
    assert!(body.is_null());
}
