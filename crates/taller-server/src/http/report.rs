// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::RequestId;
use crate::http::utilities::{api_error_response, with_store};
use crate::streaming::{spawn_body_writer, CHUNK_BYTES};
use crate::AppState;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use std::io::BufWriter;
use taller_api::{parse_folio_param, ApiError};
use taller_report::{render_record, CONTENT_TYPE};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

/// Streams the record's PDF. Lookup failures are answered before the first
/// document byte is produced.
pub(crate) async fn record_pdf_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_folio): Path<String>,
) -> Response {
    let folio = match parse_folio_param(&raw_folio) {
        Ok(folio) => folio,
        Err(err) => return api_error_response(err, &request_id),
    };
    let record = match with_store(state.store.clone(), move |store| store.fetch(folio)).await {
        Ok(Some(record)) => record,
        Ok(None) => return api_error_response(ApiError::not_found("record not found"), &request_id),
        Err(err) => {
            error!(request_id = %request_id.0, %folio, error = %err, "record lookup failed");
            return api_error_response(ApiError::internal("could not load record"), &request_id);
        }
    };

    let (tx, rx) = mpsc::channel(state.api.pdf_channel_chunks.max(1));
    let watermark = state.watermark.clone();
    let rid = request_id.0.clone();
    spawn_body_writer(tx, move |writer| {
        let mut sink = BufWriter::with_capacity(CHUNK_BYTES, writer);
        match render_record(&record, watermark.as_deref(), &mut sink) {
            Ok(bytes) => debug!(request_id = %rid, folio = %record.folio, bytes, "report streamed"),
            Err(err) if err.is_sink_closed() => {
                debug!(request_id = %rid, folio = %record.folio, "client left before report finished");
            }
            Err(err) => {
                error!(request_id = %rid, folio = %record.folio, error = %err, "report rendering failed");
                sink.get_ref().abort("report rendering failed");
            }
        }
    });

    let mut response = (StatusCode::OK, Body::from_stream(ReceiverStream::new(rx))).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename={}", folio.document_filename()))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}
