// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::RequestId;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use taller_api::{map_error, ApiError};
use taller_query::{RecordStore, StoreError, StoreErrorCode};

pub(crate) fn api_error_response(err: ApiError, request_id: &RequestId) -> Response {
    let status =
        StatusCode::from_u16(map_error(&err)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let err = err.with_request_id(request_id.0.clone());
    (status, Json(err.envelope())).into_response()
}

/// Runs a store call on the blocking pool.
pub(crate) async fn with_store<T, F>(store: Arc<RecordStore>, f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&RecordStore) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| {
            StoreError::backend(StoreErrorCode::Unavailable, format!("store task failed: {e}"))
        })?
}
