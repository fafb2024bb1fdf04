//! HTTP Handlers
//!
//! Generic over the record type; the router instantiates them per kind.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::application::{CreateRecordsUseCase, GetRecordUseCase, PatchRecordUseCase};
use crate::domain::records::Record;
use crate::domain::repository::RecordStore;
use crate::error::SchoolResult;
use crate::presentation::dto::{DataResponse, ListResponse};

/// Shared state for record handlers
pub struct RecordState<S> {
    pub store: Arc<S>,
}

impl<S> Clone for RecordState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

/// POST /{kind}s
pub async fn create_records<T, S>(
    State(state): State<RecordState<S>>,
    body: Result<Json<Vec<T>>, JsonRejection>,
) -> SchoolResult<(StatusCode, Json<ListResponse<T>>)>
where
    T: Record + Serialize + DeserializeOwned,
    S: RecordStore<T> + Send + Sync + 'static,
{
    let Json(records) = body?;
    let use_case = CreateRecordsUseCase::new(state.store.clone());
    let created = use_case.execute(records).await?;

    Ok((StatusCode::CREATED, Json(ListResponse::success(created))))
}

/// GET /{kind}s/{id}
pub async fn get_record<T, S>(
    State(state): State<RecordState<S>>,
    id: Result<Path<i64>, PathRejection>,
) -> SchoolResult<Json<DataResponse<T>>>
where
    T: Record + Serialize,
    S: RecordStore<T> + Send + Sync + 'static,
{
    let Path(id) = id?;
    let use_case = GetRecordUseCase::new(state.store.clone());
    let record = use_case.execute::<T>(id).await?;

    Ok(Json(DataResponse::success(record)))
}

/// PATCH /{kind}s
///
/// The body is a patch document: the record with every field left out (or
/// empty) that should keep its stored value. `id` selects the record.
pub async fn patch_record<T, S>(
    State(state): State<RecordState<S>>,
    body: Result<Json<T>, JsonRejection>,
) -> SchoolResult<Json<DataResponse<T>>>
where
    T: Record + Serialize + DeserializeOwned,
    S: RecordStore<T> + Send + Sync + 'static,
{
    let Json(patch) = body?;
    let use_case = PatchRecordUseCase::new(state.store.clone());
    let updated = use_case.execute(patch).await?;

    Ok(Json(DataResponse::success(updated)))
}
