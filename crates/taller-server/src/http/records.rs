// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::RequestId;
use crate::http::utilities::{api_error_response, with_store};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Utc;
use std::collections::BTreeMap;
use taller_api::{parse_list_params, parse_record_draft, ApiError};
use taller_query::StoreError;
use tracing::{error, info};

pub(crate) async fn list_records_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let params = parse_list_params(&query);
    let result = with_store(state.store.clone(), move |store| {
        store.list(&params.filter, &params.sort)
    })
    .await;
    match result {
        Ok(records) => Json(records).into_response(),
        Err(err) => {
            error!(request_id = %request_id.0, error = %err, "record listing failed");
            api_error_response(ApiError::internal("could not retrieve records"), &request_id)
        }
    }
}

pub(crate) async fn create_record_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    let draft = match parse_record_draft(&body) {
        Ok(draft) => draft,
        Err(err) => return api_error_response(err, &request_id),
    };
    let today = Utc::now().date_naive();
    let result = with_store(state.store.clone(), move |store| store.insert(&draft, today)).await;
    match result {
        Ok(receipt) => {
            info!(request_id = %request_id.0, folio = %receipt.folio, "record created");
            Json(receipt).into_response()
        }
        Err(StoreError::Invalid(err)) => {
            api_error_response(ApiError::validation_failed(&err), &request_id)
        }
        Err(err) => {
            error!(request_id = %request_id.0, error = %err, "record insert failed");
            api_error_response(ApiError::internal("could not save record"), &request_id)
        }
    }
}
