// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::extract_request_id;
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, Instrument};

/// Assigns the request id, wraps the handler in a span and writes one audit
/// line per request.
pub(crate) async fn request_tracing_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = extract_request_id(request.headers(), &state);
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id.0,
        method = %method,
        path = %path,
    );
    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.0) {
        response.headers_mut().insert("x-request-id", value);
    }
    info!(
        target: "taller_audit",
        request_id = %request_id.0,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "audit"
    );
    response
}
