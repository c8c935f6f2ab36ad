// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::http::HeaderMap;
use std::sync::atomic::Ordering;

/// Request identifier shared by the audit line, error bodies and the
/// `x-request-id` response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

#[must_use]
pub(crate) fn extract_request_id(headers: &HeaderMap, state: &AppState) -> RequestId {
    let id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
            format!("req-{id:016x}")
        });
    RequestId(id)
}
