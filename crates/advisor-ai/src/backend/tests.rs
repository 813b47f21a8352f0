//! HttpScheduleBackend against an in-process axum server.

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::*;

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn serve() -> String {
    let router = Router::new()
        .route(
            "/api/pensum",
            get(|headers: HeaderMap| async move {
                Json(json!({ "auth": bearer(&headers), "subjects": 42 }))
            }),
        )
        .route(
            "/api/schedule/:id",
            get(|Path(id): Path<String>| async move { Json(json!({ "schedule": id })) }),
        )
        .route(
            "/api/schedule/:id/group/:code",
            post(|Path((id, code)): Path<(String, String)>| async move {
                if code == "FULL-A" {
                    (StatusCode::CONFLICT, "group FULL-A has no seats").into_response()
                } else {
                    Json(json!({ "schedule": id, "added": code })).into_response()
                }
            })
            .delete(|Path((_, code)): Path<(String, String)>| async move {
                Json(json!({ "removed": code }))
            })
            .put(
                |Path((_, code)): Path<(String, String)>, Json(body): Json<Value>| async move {
                    Json(json!({ "from": code, "to": body["newCode"] }))
                },
            ),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/")
}

#[test]
fn rejects_unparseable_base_url() {
    assert!(matches!(
        HttpScheduleBackend::new("not a url"),
        Err(BackendError::InvalidUrl(_))
    ));
    assert!(matches!(
        HttpScheduleBackend::new("mailto:someone@example.com"),
        Err(BackendError::InvalidUrl(_))
    ));
}

#[test]
fn endpoint_joins_and_encodes_segments() {
    let backend = HttpScheduleBackend::new("http://localhost:8081/").unwrap();
    let url = backend.endpoint(&["schedule", "7", "group", "a/b c"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:8081/schedule/7/group/a%2Fb%20c");

    let nested = HttpScheduleBackend::new("http://localhost:8081/api/").unwrap();
    let url = nested.endpoint(&["pensum"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:8081/api/pensum");
}

#[tokio::test]
async fn forwards_bearer_credential() {
    let backend = HttpScheduleBackend::new(&serve().await).unwrap();
    let pensum = backend.get_pensum("tok-1").await.unwrap();
    assert_eq!(pensum["auth"], "Bearer tok-1");
    assert_eq!(pensum["subjects"], 42);
}

#[tokio::test]
async fn group_operations_hit_expected_routes() {
    let backend = HttpScheduleBackend::new(&serve().await).unwrap();

    let schedule = backend.get_schedule("t", "12").await.unwrap();
    assert_eq!(schedule["schedule"], "12");

    let added = backend.add_group("t", "12", "1155503-A").await.unwrap();
    assert_eq!(added["added"], "1155503-A");

    let removed = backend.delete_group("t", "12", "1155501-A").await.unwrap();
    assert_eq!(removed["removed"], "1155501-A");

    let changed = backend
        .change_group("t", "12", "1155501-A", "1155501-B")
        .await
        .unwrap();
    assert_eq!(changed["from"], "1155501-A");
    assert_eq!(changed["to"], "1155501-B");
}

#[tokio::test]
async fn non_success_keeps_body_verbatim() {
    let backend = HttpScheduleBackend::new(&serve().await).unwrap();
    let err = backend.add_group("t", "12", "FULL-A").await.unwrap_err();
    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 409);
            assert_eq!(body, "group FULL-A has no seats");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let backend = HttpScheduleBackend::new("http://127.0.0.1:1/").unwrap();
    let err = backend.get_pensum("t").await.unwrap_err();
    assert!(matches!(err, BackendError::Network(_)));
}
