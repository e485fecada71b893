use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use quotevault_client::auth::{AuthClient, SessionStore};
use quotevault_client::backend::{AccountStore, FavoriteStore, QuoteSource, RestBackend};
use quotevault_client::ClientConfig;
use quotevault_shared::{ErrorKind, Field, QuoteQuery, SearchQuery};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(HashMap<String, String>, HeaderMap)>>>,
}

async fn quotes(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    recorded
        .requests
        .lock()
        .unwrap()
        .push((params.clone(), headers.clone()));

    if params.get("text").map(String::as_str) == Some("ilike.*broken*") {
        return (StatusCode::OK, "[{\"id\": 12}]").into_response();
    }

    let wants_count = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("count=exact"));
    if wants_count {
        return (
            StatusCode::OK,
            [("content-range", "0-0/45")],
            Json(json!([{ "id": Uuid::from_u128(1) }])),
        )
            .into_response();
    }

    Json(json!([
        {
            "id": Uuid::from_u128(2),
            "text": "Simplicity is the ultimate sophistication",
            "author": "Leonardo da Vinci",
            "category_id": null,
            "created_at": "2026-01-02T00:00:00Z"
        },
        {
            "id": Uuid::from_u128(1),
            "text": "Well done is better than well said",
            "author": "Benjamin Franklin",
            "category_id": null,
            "created_at": "2026-01-01T00:00:00Z"
        }
    ]))
    .into_response()
}

async fn favorites() -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({ "code": "23505", "message": "duplicate key value violates unique constraint" })),
    )
        .into_response()
}

async fn profiles() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "JWT expired" }))).into_response()
}

async fn token(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("grant_type").map(String::as_str) == Some("password") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
        )
            .into_response();
    }
    (StatusCode::BAD_REQUEST, Json(json!({ "msg": "Invalid Refresh Token" }))).into_response()
}

async fn recover(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    recorded.requests.lock().unwrap().push((params, headers));
    Json(json!({})).into_response()
}

async fn start() -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/rest/v1/quotes", get(quotes))
        .route("/rest/v1/user_favorites", post(favorites))
        .route("/rest/v1/profiles", get(profiles))
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/recover", post(recover))
        .with_state(recorded.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorded)
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        api_url: Some(format!("http://{addr}")),
        api_key: Some("anon-key".into()),
        ..ClientConfig::default()
    }
}

fn backend(addr: SocketAddr) -> RestBackend {
    RestBackend::new(&config(addr), SessionStore::new()).unwrap()
}

#[tokio::test]
async fn page_read_sends_filters_and_auth() {
    let (addr, recorded) = start().await;
    let backend = backend(addr);

    let rows = backend
        .fetch_quotes(&QuoteQuery::default().range(20, 20))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].author, "Leonardo da Vinci");

    let requests = recorded.requests.lock().unwrap();
    let (params, headers) = &requests[0];
    assert_eq!(params["order"], "created_at.desc,id.desc");
    assert_eq!(params["offset"], "20");
    assert_eq!(params["limit"], "20");
    assert_eq!(headers["apikey"], "anon-key");
    // No session: the API key doubles as bearer.
    assert_eq!(headers["authorization"], "Bearer anon-key");
}

#[tokio::test]
async fn count_comes_from_content_range() {
    let (addr, _) = start().await;
    let total = backend(addr)
        .count_quotes(&QuoteQuery::default())
        .await
        .unwrap();
    assert_eq!(total, 45);
}

#[tokio::test]
async fn search_pushes_or_to_server() {
    let (addr, recorded) = start().await;
    backend(addr)
        .search_quotes(&SearchQuery::new("well", 0, 20))
        .await
        .unwrap();

    let requests = recorded.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].0["or"],
        "(text.ilike.\"*well*\",author.ilike.\"*well*\")"
    );
}

#[tokio::test]
async fn statuses_map_to_error_kinds() {
    let (addr, _) = start().await;
    let backend = backend(addr);

    let err = backend
        .insert_favorite(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.to_string(), "Favorite already exists");

    let err = backend.get_profile(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn malformed_rows_are_a_decode_error() {
    let (addr, _) = start().await;
    let err = backend(addr)
        .fetch_quotes(&QuoteQuery::default().text_contains("broken"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn empty_id_list_skips_the_request() {
    let (addr, recorded) = start().await;
    let rows = backend(addr)
        .fetch_quotes(&QuoteQuery::default().ids_in(Vec::new()))
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert!(recorded.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_is_a_validation_error() {
    let (addr, _) = start().await;
    let auth = AuthClient::new(&config(addr), SessionStore::new()).unwrap();

    let err = auth
        .sign_in("reader@example.com", "not-the-password")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some(Field::Password));
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(auth.session().current().is_none());
}

#[tokio::test]
async fn recovery_redirect_is_query_encoded() {
    let (addr, recorded) = start().await;
    let auth = AuthClient::new(&config(addr), SessionStore::new()).unwrap();

    auth.send_password_reset("reader@example.com").await.unwrap();

    let requests = recorded.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0["redirect_to"], "quotevault://reset-password");
}
