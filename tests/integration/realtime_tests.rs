//! Tests for the REST clients against local stub services.
//!
//! Each test spawns axum stubs on an ephemeral port that speak the Realtime
//! Database and Identity Toolkit wire formats, then drives the real clients
//! (and, end to end, the full router) against them.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use url::Url;

use tapvote::error::{StoreError, VerifyError};
use tapvote::identity::{IdentityToolkitVerifier, IdentityVerifier};
use tapvote::store::{DocumentStore, RealtimeDatabase, StorePath};
use tapvote::{create_router, AuthGate, QuestionnaireService, RouterConfig};

use super::test_utils::{api_request, sample_questionnaire, send_json, MemoryStore};

const SECRET: &str = "db-secret";
const API_KEY: &str = "web-api-key";

// =============================================================================
// Stub Services
// =============================================================================

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

/// An address nothing listens on.
async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[derive(Clone)]
struct DatabaseStub {
    store: MemoryStore,
    secret: Option<String>,
}

/// Serve `{path}.json` against a [`MemoryStore`].
async fn database_stub(
    State(stub): State<DatabaseStub>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    if let Some(secret) = &stub.secret {
        if params.get("auth") != Some(secret) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Permission denied"})),
            )
                .into_response();
        }
    }

    let Some(raw) = uri.path().strip_suffix(".json") else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "404 Not Found"}))).into_response();
    };
    let path = raw
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).unwrap().into_owned())
        .fold(StorePath::root(), |path, segment| path.child(segment));

    let result = match method {
        Method::GET => stub.store.read(&path).await.map(|value| {
            let value = value.unwrap_or(Value::Null);
            if params.contains_key("shallow") {
                shallow(value)
            } else {
                value
            }
        }),
        Method::PUT => {
            let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            stub.store.set(&path, value.clone()).await.map(|_| value)
        }
        Method::POST => {
            let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            stub.store
                .push(&path, value)
                .await
                .map(|key| json!({"name": key}))
        }
        Method::DELETE => stub.store.remove(&path).await.map(|_| Value::Null),
        _ => return StatusCode::METHOD_NOT_ALLOWED.into_response(),
    };

    match result {
        Ok(value) => Json(value).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

fn shallow(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, _)| (k, json!(true))).collect())
        }
        other => other,
    }
}

async fn spawn_database(store: MemoryStore, secret: Option<&str>) -> Url {
    let stub = DatabaseStub {
        store,
        secret: secret.map(str::to_string),
    };
    let app = Router::new().fallback(database_stub).with_state(stub);
    let addr = spawn(app).await;
    Url::parse(&format!("http://{}", addr)).unwrap()
}

#[derive(Clone)]
struct IdentityStub {
    users: HashMap<String, String>,
}

/// Serve `accounts:lookup` from a token table.
async fn identity_stub(
    State(stub): State<IdentityStub>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if !uri.path().ends_with("/accounts:lookup") {
        return StatusCode::NOT_FOUND.into_response();
    }

    if params.get("key").map(String::as_str) != Some(API_KEY) {
        return lookup_error("API key not valid. Please pass a valid API key.");
    }

    let token = body["idToken"].as_str().unwrap_or_default();
    match stub.users.get(token) {
        Some(uid) => Json(json!({
            "kind": "identitytoolkit#GetAccountInfoResponse",
            "users": [{"localId": uid, "emailVerified": false}]
        }))
        .into_response(),
        None => lookup_error("INVALID_ID_TOKEN"),
    }
}

fn lookup_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {"code": 400, "message": message, "errors": []}})),
    )
        .into_response()
}

async fn spawn_identity(users: &[(&str, &str)]) -> Url {
    let stub = IdentityStub {
        users: users
            .iter()
            .map(|(token, uid)| (token.to_string(), uid.to_string()))
            .collect(),
    };
    let app = Router::new().fallback(identity_stub).with_state(stub);
    let addr = spawn(app).await;
    Url::parse(&format!("http://{}/v1", addr)).unwrap()
}

fn path(segments: &[&str]) -> StorePath {
    segments
        .iter()
        .fold(StorePath::root(), |path, segment| path.child(*segment))
}

// =============================================================================
// Realtime Database Client
// =============================================================================

#[tokio::test]
async fn test_database_read_existing_and_missing() {
    let store = MemoryStore::new().with_value("/questionnaires/u1/q1", json!({"name": "Stored"}));
    let url = spawn_database(store, Some(SECRET)).await;
    let database = RealtimeDatabase::new(&url, Some(SECRET.to_string()));

    let value = database
        .read(&path(&["questionnaires", "u1", "q1"]))
        .await
        .unwrap();
    assert_eq!(value, Some(json!({"name": "Stored"})));

    let subtree = database.read(&path(&["questionnaires", "u1"])).await.unwrap();
    assert_eq!(subtree, Some(json!({"q1": {"name": "Stored"}})));

    let missing = database.read(&path(&["questionnaires", "u2"])).await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_database_set_push_remove() {
    let store = MemoryStore::new();
    let url = spawn_database(store.clone(), Some(SECRET)).await;
    let database = RealtimeDatabase::new(&url, Some(SECRET.to_string()));

    database
        .set(&path(&["published", "p1"]), json!({"name": "Set"}))
        .await
        .unwrap();
    assert_eq!(store.peek("/published/p1"), Some(json!({"name": "Set"})));

    let key = database
        .push(&path(&["questionnaires", "u1"]), json!({"name": "Pushed"}))
        .await
        .unwrap();
    assert!(!key.is_empty());
    assert_eq!(
        store.peek(&format!("/questionnaires/u1/{}", key)),
        Some(json!({"name": "Pushed"}))
    );

    database.remove(&path(&["published", "p1"])).await.unwrap();
    assert_eq!(store.peek("/published/p1"), None);

    // Removing a missing node is not an error.
    database.remove(&path(&["published", "p1"])).await.unwrap();
}

#[tokio::test]
async fn test_database_segments_are_encoded() {
    let store = MemoryStore::new();
    let url = spawn_database(store.clone(), None).await;
    let database = RealtimeDatabase::new(&url, None);

    let tricky = path(&["published", "a/b c"]);
    database.set(&tricky, json!({"name": "Tricky"})).await.unwrap();

    // The stub decoded one segment, not two.
    assert_eq!(store.operations(), vec![("set", "/published/a/b c".to_string())]);
    assert_eq!(
        store.read(&tricky).await.unwrap(),
        Some(json!({"name": "Tricky"}))
    );
    assert_eq!(store.peek("/published/a"), None);
}

#[tokio::test]
async fn test_database_wrong_secret() {
    let url = spawn_database(MemoryStore::new(), Some(SECRET)).await;
    let database = RealtimeDatabase::new(&url, Some("wrong".to_string()));

    let err = database.read(&path(&["published", "p1"])).await.unwrap_err();
    match err {
        StoreError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Permission denied");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    assert!(database.ping().await.is_err());
}

#[tokio::test]
async fn test_database_ping() {
    let store = MemoryStore::new().with_value("/published/p1", json!({"name": "Big"}));
    let url = spawn_database(store.clone(), Some(SECRET)).await;
    let database = RealtimeDatabase::new(&url, Some(SECRET.to_string()));

    database.ping().await.unwrap();
    assert_eq!(store.operations(), vec![("read", "/".to_string())]);
}

#[tokio::test]
async fn test_database_unreachable() {
    let addr = closed_addr().await;
    let url = Url::parse(&format!("http://{}", addr)).unwrap();
    let database = RealtimeDatabase::new(&url, None);

    let err = database.read(&path(&["published"])).await.unwrap_err();
    assert!(matches!(err, StoreError::Connection(_)), "got {:?}", err);
}

// =============================================================================
// Identity Toolkit Verifier
// =============================================================================

#[tokio::test]
async fn test_verifier_accepts_known_token() {
    let endpoint = spawn_identity(&[("good-token", "uid-123")]).await;
    let verifier = IdentityToolkitVerifier::new(&endpoint, API_KEY);

    let identity = verifier.verify("good-token").await.unwrap();
    assert_eq!(identity.uid, "uid-123");
}

#[tokio::test]
async fn test_verifier_rejects_unknown_token() {
    let endpoint = spawn_identity(&[("good-token", "uid-123")]).await;
    let verifier = IdentityToolkitVerifier::new(&endpoint, API_KEY);

    let err = verifier.verify("expired-token").await.unwrap_err();
    assert!(matches!(err, VerifyError::Rejected(ref m) if m == "INVALID_ID_TOKEN"), "got {:?}", err);
}

#[tokio::test]
async fn test_verifier_wrong_api_key() {
    let endpoint = spawn_identity(&[("good-token", "uid-123")]).await;
    let verifier = IdentityToolkitVerifier::new(&endpoint, "not-the-key");

    let err = verifier.verify("good-token").await.unwrap_err();
    assert!(matches!(err, VerifyError::Rejected(ref m) if m.contains("API key")));
}

#[tokio::test]
async fn test_verifier_unreachable() {
    let addr = closed_addr().await;
    let endpoint = Url::parse(&format!("http://{}/v1", addr)).unwrap();
    let verifier = IdentityToolkitVerifier::new(&endpoint, API_KEY);

    let err = verifier.verify("good-token").await.unwrap_err();
    assert!(matches!(err, VerifyError::Connection(_)), "got {:?}", err);
}

// =============================================================================
// End to End
// =============================================================================

#[tokio::test]
async fn test_router_over_rest_clients() {
    let store = MemoryStore::new();
    let database_url = spawn_database(store.clone(), Some(SECRET)).await;
    let endpoint = spawn_identity(&[("alice-token", "alice")]).await;

    let client = reqwest::Client::new();
    let router = create_router(
        QuestionnaireService::new(RealtimeDatabase::with_client(
            client.clone(),
            &database_url,
            Some(SECRET.to_string()),
        )),
        AuthGate::new(IdentityToolkitVerifier::with_client(client, &endpoint, API_KEY)),
        RouterConfig::new().with_tracing(false),
    );

    let request = api_request(
        Method::POST,
        "/api/v1/questionnaires",
        Some("alice-token"),
        Some(sample_questionnaire("Wire")),
    );
    let (status, created) = send_json(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    let key = created["key"].as_str().unwrap().to_string();

    let request = api_request(Method::GET, "/api/v1/questionnaires", Some("alice-token"), None);
    let (status, listed) = send_json(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[&key], sample_questionnaire("Wire"));

    let uri = format!("/api/v1/questionnaires/list/{}", key);
    let request = api_request(
        Method::PUT,
        &uri,
        Some("alice-token"),
        Some(sample_questionnaire("Wire")),
    );
    let (status, _) = send_json(&router, request).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/v1/questionnaires/published/{}", key);
    let (status, published) = send_json(&router, api_request(Method::GET, &uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published, sample_questionnaire("Wire"));

    let request = api_request(Method::GET, "/api/v1/questionnaires", Some("bad-token"), None);
    let (status, _) = super::test_utils::send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
