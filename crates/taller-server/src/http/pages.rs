// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::RequestId;
use crate::http::utilities::api_error_response;
use crate::AppState;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Extension;
use taller_api::ApiError;

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

pub(crate) async fn index_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    let path = state.api.static_root.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => api_error_response(ApiError::not_found("landing page not found"), &request_id),
    }
}
