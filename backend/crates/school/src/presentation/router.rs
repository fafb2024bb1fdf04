//! School Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::records::{Exec, Record, Student, Teacher};
use crate::domain::repository::RecordStore;
use crate::infra::memory::MemoryStore;
use crate::presentation::handlers::{self, RecordState};

/// Routes for one record kind under `base`
///
/// `POST base` and `PATCH base`, plus `GET base/{id}`. With
/// `with_create = false` the collection route only accepts `PATCH` (execs
/// are created through the account flow, which hashes passwords).
pub fn record_routes<T, S>(base: &str, store: Arc<S>, with_create: bool) -> Router
where
    T: Record + Serialize + DeserializeOwned,
    S: RecordStore<T> + Send + Sync + 'static,
{
    let state = RecordState { store };

    let collection = if with_create {
        post(handlers::create_records::<T, S>).patch(handlers::patch_record::<T, S>)
    } else {
        axum::routing::patch(handlers::patch_record::<T, S>)
    };

    Router::new()
        .route(base, collection)
        .route(&format!("{base}/{{id}}"), get(handlers::get_record::<T, S>))
        .with_state(state)
}

/// Teacher, student and exec record routes over in-memory stores
pub fn school_router(
    teachers: MemoryStore<Teacher>,
    students: MemoryStore<Student>,
    execs: MemoryStore<Exec>,
) -> Router {
    Router::new()
        .merge(record_routes::<Teacher, _>("/teachers", Arc::new(teachers), true))
        .merge(record_routes::<Student, _>("/students", Arc::new(students), true))
        .merge(record_routes::<Exec, _>("/execs", Arc::new(execs), false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        school_router(MemoryStore::new(), MemoryStore::new(), MemoryStore::new())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_create_then_patch_teacher() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/teachers",
            Some(json!([{
                "first_name": "Alice",
                "last_name": "Brown",
                "class": "9C",
                "subject": "History",
                "email": "ab@example.net"
            }])),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"][0]["id"], 1);

        let (status, body) = send(
            &app,
            "PATCH",
            "/teachers",
            Some(json!({"id": 1, "class": "11C"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Success");
        assert_eq!(body["data"]["class"], "11C");
        assert_eq!(body["data"]["subject"], "History");

        let (status, body) = send(&app, "GET", "/teachers/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["class"], "11C");
    }

    #[tokio::test]
    async fn test_patch_missing_student_is_404() {
        let app = app();
        let (status, body) = send(
            &app,
            "PATCH",
            "/students",
            Some(json!({"id": 7, "email": "x@example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "record not found");
    }

    #[tokio::test]
    async fn test_patch_without_id_is_400() {
        let app = app();
        let (status, body) = send(&app, "PATCH", "/students", Some(json!({"email": "x@example.com"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "invalid student id");
    }

    #[tokio::test]
    async fn test_execs_cannot_be_created_here() {
        let app = app();
        let (status, _) = send(&app, "POST", "/execs", Some(json!([]))).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unreadable_input_is_400() {
        let app = app();

        let (status, body) = send(&app, "GET", "/teachers/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "invalid path parameter");

        let (status, body) = send(&app, "PATCH", "/teachers", Some(json!("not a teacher"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "invalid request body");
    }
}
