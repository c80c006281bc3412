//! The HTTP surface driven in-process through the router.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use axum::Router;
use docgate::backend::StoreBackend;
use docgate::bson::{Bson, doc};
use docgate::memory::InMemoryStore;
use serde_json::{Value, json};
use server::{ServerConfig, ServerState, build_router};
use tower::ServiceExt;

async fn app() -> Router {
    let state = ServerState::open(ServerConfig::default()).await.unwrap();
    build_router(Arc::new(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn things_scenario_end_to_end() {
    let app = app().await;

    let response = send(&app, "POST", "/things", r#"{"x":1}"#).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/things/1");
    assert!(body_text(response).await.is_empty());

    let response = send(&app, "GET", "/things", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_json(response).await, json!([{ "x": 1, "uid": 1 }]));

    let response = send(&app, "GET", "/things/1", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "x": 1, "uid": 1 }));

    let response = send(&app, "GET", "/things/2", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn root_lists_created_collections() {
    let app = app().await;

    assert_eq!(body_json(send(&app, "GET", "/", Body::empty()).await).await, json!([]));

    send(&app, "POST", "/widgets", r#"{"name":"a"}"#).await;
    send(&app, "POST", "/gadgets", r#"{"name":"b"}"#).await;

    let response = send(&app, "GET", "/", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(["gadgets", "widgets"]));
}

#[tokio::test]
async fn client_uid_is_replaced() {
    let app = app().await;

    send(&app, "POST", "/widgets", r#"{"uid":99,"name":"a"}"#).await;

    let response = send(&app, "GET", "/widgets/1", Body::empty()).await;
    assert_eq!(body_json(response).await, json!({ "name": "a", "uid": 1 }));
    assert_eq!(send(&app, "GET", "/widgets/99", Body::empty()).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_object_payload_is_stored_without_uid() {
    let app = app().await;

    let response = send(&app, "POST", "/numbers", "[1,2,3]").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get(header::LOCATION).is_none());

    let response = send(&app, "GET", "/numbers", Body::empty()).await;
    assert_eq!(body_json(response).await, json!([[1, 2, 3]]));
}

#[tokio::test]
async fn malformed_payload_is_bad_request() {
    let app = app().await;

    let response = send(&app, "POST", "/widgets", "{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");

    // Nothing was stored and no uid was consumed
    assert_eq!(body_json(send(&app, "GET", "/", Body::empty()).await).await, json!([]));
    send(&app, "POST", "/widgets", "{}").await;
    assert_eq!(send(&app, "GET", "/widgets/1", Body::empty()).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_numeric_uid_is_bad_request() {
    let app = app().await;

    let response = send(&app, "GET", "/things/abc", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_collection_lists_empty() {
    let app = app().await;

    let response = send(&app, "GET", "/nothing", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app().await;

    let response = send(&app, "GET", "/a/1/extra", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn env_dumps_properties_then_environment() {
    let app = app().await;

    for method in ["GET", "POST", "DELETE"] {
        let response = send(&app, method, "/env", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );

        let text = body_text(response).await;
        assert!(text.starts_with("System Properties:\n"));
        assert!(text.contains("\n\nSystem Environment:\n"));
        assert!(text.contains("docgate.port: 8080\n"));
        assert!(text.contains(&format!("os.name: {}\n", std::env::consts::OS)));
    }
}

#[tokio::test]
async fn env_is_not_a_collection() {
    let app = app().await;

    send(&app, "POST", "/env", r#"{"x":1}"#).await;

    assert_eq!(body_json(send(&app, "GET", "/", Body::empty()).await).await, json!([]));
}

#[tokio::test]
async fn request_id_is_generated_or_echoed() {
    let app = app().await;

    let response = send(&app, "GET", "/", Body::empty()).await;
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ServerConfig { max_body_size_mb: 1, ..ServerConfig::default() };
    let app = build_router(Arc::new(ServerState::open(config).await.unwrap()));

    let payload = format!("\"{}\"", "a".repeat(2 * 1024 * 1024));
    let response = send(&app, "POST", "/blobs", payload).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn non_utf8_body_is_bad_request() {
    let app = app().await;

    let response = send(&app, "POST", "/widgets", vec![b'{', 0xff, b'}']).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn undecodable_collection_segment_is_bad_request() {
    let app = app().await;

    for (method, body) in [("GET", ""), ("POST", "{}")] {
        let response = send(&app, method, "/%FF", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn unrepresentable_number_is_unprocessable_and_keeps_uids() {
    let app = app().await;

    let response = send(&app, "POST", "/big", r#"{"n":18446744073709551615}"#).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_DOCUMENT");

    let response = send(&app, "POST", "/big", r#"{"n":1}"#).await;
    assert_eq!(response.headers()[header::LOCATION], "/big/1");
}

#[tokio::test]
async fn documents_keep_client_key_order() {
    let app = app().await;

    send(&app, "POST", "/ordered", r#"{"z":1,"a":2}"#).await;

    let response = send(&app, "GET", "/ordered", Body::empty()).await;
    assert_eq!(body_text(response).await, r#"[{"z":1,"a":2,"uid":1}]"#);

    let response = send(&app, "GET", "/ordered/1", Body::empty()).await;
    assert_eq!(body_text(response).await, r#"{"z":1,"a":2,"uid":1}"#);
}

#[tokio::test]
async fn startup_reset_keeps_only_reserved_collections() {
    let store = InMemoryStore::new();
    store
        .insert_documents(vec![Bson::Document(doc! { "name": "idx" })], "system.indexes")
        .await
        .unwrap();
    store
        .insert_documents(vec![Bson::Document(doc! { "uid": 7_i64 })], "stale")
        .await
        .unwrap();

    let state = ServerState::with_backend(ServerConfig::default(), Box::new(store.clone()))
        .await
        .unwrap();
    let app = build_router(Arc::new(state));

    assert_eq!(body_json(send(&app, "GET", "/", Body::empty()).await).await, json!([]));
    assert_eq!(store.len("stale").await, 0);
    assert_eq!(store.len("system.indexes").await, 1);

    // Counters start over after the reset
    let response = send(&app, "POST", "/stale", "{}").await;
    assert_eq!(response.headers()[header::LOCATION], "/stale/1");
}
