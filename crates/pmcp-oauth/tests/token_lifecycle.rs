//! End-to-end token lifecycle tests against a mock Pinterest token endpoint

use chrono::Utc;
use pmcp_config::AppConfig;
use pmcp_oauth::{FileTokenStore, MemoryTokenStore, Token, TokenExchanger, TokenManager, TokenStore};
use pmcp_types::AppError;
use std::path::PathBuf;
use std::sync::Arc;
use wiremock::matchers::{basic_auth, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_ID: &str = "test-app-id";
const APP_SECRET: &str = "test-app-secret";

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        app_id: APP_ID.to_string(),
        app_secret: APP_SECRET.to_string(),
        redirect_uri: "http://localhost:8085/".to_string(),
        api_base_url: server.uri(),
        authorize_url: "https://www.pinterest.com/oauth/".to_string(),
        token_path: PathBuf::from("/tmp/unused.json"),
        refresh_buffer_seconds: 60,
        scopes: vec!["boards:read".to_string()],
    }
}

fn manager_for(server: &MockServer, store: Arc<dyn TokenStore>) -> TokenManager {
    TokenManager::new(store, TokenExchanger::new(config_for(server)), 60)
}

fn stored_token(expires_offset_ms: i64, refresh: Option<&str>) -> Token {
    Token {
        access_token: "X".to_string(),
        refresh_token: refresh.map(|r| r.to_string()),
        expires_at: Some(Utc::now().timestamp_millis() + expires_offset_ms),
        scopes: vec!["boards:read".to_string()],
        name: "Pinterest API Token".to_string(),
    }
}

// Scenario A: empty store means "authentication required", not an error.
#[tokio::test]
async fn empty_store_yields_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let manager = manager_for(&server, Arc::new(MemoryTokenStore::new()));
    assert!(manager.get_valid_token().await.unwrap().is_none());
}

// Scenario B: a valid token comes back unchanged with zero exchange calls.
#[tokio::test]
async fn valid_token_returned_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let token = stored_token(3_600_000, Some("R"));
    let manager = manager_for(&server, Arc::new(MemoryTokenStore::with_token(token.clone())));

    let result = manager.get_valid_token().await.unwrap().unwrap();
    assert_eq!(result, token);
}

// Scenario C: an expired token with a refresh token triggers one refresh
// exchange; the new token is returned and persisted.
#[tokio::test]
async fn expired_token_is_refreshed_and_persisted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth(APP_ID, APP_SECRET))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=R"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "Y",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "R2",
            "scope": "boards:read"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token(stored_token(-1_000, Some("R"))));
    let manager = manager_for(&server, store.clone());

    let before_ms = Utc::now().timestamp_millis();
    let result = manager.get_valid_token().await.unwrap().unwrap();

    assert_eq!(result.access_token, "Y");
    assert_eq!(result.refresh_token, Some("R2".to_string()));
    let expires_at = result.expires_at.unwrap();
    assert!(expires_at >= before_ms + 3_600_000);
    assert!(expires_at <= Utc::now().timestamp_millis() + 3_600_000);

    // The store now holds the new token.
    let persisted = store.read().await.unwrap().unwrap();
    assert_eq!(persisted, result);
}

// Scenario D: expired with no refresh token yields absent, zero network.
#[tokio::test]
async fn expired_without_refresh_token_yields_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::with_token(stored_token(-1_000, None))),
    );
    assert!(manager.get_valid_token().await.unwrap().is_none());
}

// Scenario E: a rejected refresh propagates as an exchange error with the
// provider payload attached, and the store keeps the stale token.
#[tokio::test]
async fn failed_refresh_propagates_and_keeps_stale_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": 283,
            "message": "Invalid refresh token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stale = stored_token(-1_000, Some("R"));
    let store = Arc::new(MemoryTokenStore::with_token(stale.clone()));
    let manager = manager_for(&server, store.clone());

    let err = manager.get_valid_token().await.unwrap_err();
    match err {
        AppError::Exchange { payload, .. } => {
            let payload = payload.expect("provider payload attached");
            assert_eq!(payload["code"], 283);
        }
        other => panic!("expected Exchange error, got {:?}", other),
    }

    assert_eq!(store.read().await.unwrap(), Some(stale));
}

// Concurrent callers hitting an expired token share one refresh exchange.
#[tokio::test]
async fn concurrent_callers_share_one_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "Y",
            "expires_in": 3600,
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token(stored_token(-1_000, Some("R"))));
    let manager = Arc::new(manager_for(&server, store));

    let (a, b) = tokio::join!(manager.get_valid_token(), manager.get_valid_token());
    assert_eq!(a.unwrap().unwrap().access_token, "Y");
    assert_eq!(b.unwrap().unwrap().access_token, "Y");
}

// A refresh response without a refresh_token leaves the record without
// refresh capability until re-authorization.
#[tokio::test]
async fn refresh_without_rotation_drops_old_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "Y",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token(stored_token(-1_000, Some("R"))));
    let manager = manager_for(&server, store.clone());

    let result = manager.get_valid_token().await.unwrap().unwrap();
    assert_eq!(result.refresh_token, None);
    assert_eq!(store.read().await.unwrap().unwrap().refresh_token, None);
}

// Authorization-code exchange sends the documented form fields and persists
// the minted token to the file store.
#[tokio::test]
async fn code_exchange_persists_token_to_disk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth(APP_ID, APP_SECRET))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code-123"))
        .and(body_string_contains("continuous_refresh=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "A1",
            "expires_in": 2_592_000,
            "refresh_token": "R1",
            "scope": "boards:read,pins:read"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("pinterest_token.json"));
    let exchanger = TokenExchanger::new(config_for(&server));

    let token = exchanger.exchange_code("auth-code-123", &store).await.unwrap();
    assert_eq!(token.access_token, "A1");
    assert_eq!(token.scopes, vec!["boards:read", "pins:read"]);

    let persisted = store.read().await.unwrap().unwrap();
    assert_eq!(persisted, token);
}

// Revoking twice in a row: the second call is a local no-op with no
// further remote call.
#[tokio::test]
async fn revoke_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token/revoke"))
        .and(query_param("client_id", APP_ID))
        .and(query_param("token", "X"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token(stored_token(3_600_000, Some("R"))));
    let manager = manager_for(&server, store.clone());

    assert!(manager.revoke_current().await.unwrap());
    assert!(store.read().await.unwrap().is_none());

    assert!(!manager.revoke_current().await.unwrap());
}

// Remote revoke failure still clears local state: fail safe toward
// unauthenticated.
#[tokio::test]
async fn revoke_clears_locally_when_remote_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token/revoke"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token(stored_token(3_600_000, None)));
    let manager = manager_for(&server, store.clone());

    assert!(manager.revoke_current().await.unwrap());
    assert!(store.read().await.unwrap().is_none());
}
