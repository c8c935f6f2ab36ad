// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use std::collections::BTreeMap;
use taller_model::{Folio, RecordDraft};
use taller_query::{RecordFilter, SortDirective};

pub const LIST_PARAMS: [&str; 5] = ["unit", "orderType", "date", "sortBy", "order"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListRecordsParams {
    pub filter: RecordFilter,
    pub sort: SortDirective,
}

/// Unknown keys are ignored; empty filter values behave as absent.
#[must_use]
pub fn parse_list_params(query: &BTreeMap<String, String>) -> ListRecordsParams {
    let get = |key: &str| query.get(key).cloned();
    ListRecordsParams {
        filter: RecordFilter {
            unit: get("unit"),
            order_type: get("orderType"),
            date: get("date"),
        },
        sort: SortDirective {
            sort_by: get("sortBy"),
            order: get("order"),
        },
    }
}

pub fn parse_folio_param(raw: &str) -> Result<Folio, ApiError> {
    Folio::parse(raw).ok_or_else(|| ApiError::invalid_path_param("folio", raw))
}

/// Decodes and validates a creation body. Malformed JSON and missing fields
/// map to distinct error codes.
pub fn parse_record_draft(body: &[u8]) -> Result<RecordDraft, ApiError> {
    let draft: RecordDraft =
        serde_json::from_slice(body).map_err(|e| ApiError::invalid_body(&e.to_string()))?;
    draft
        .validate()
        .map_err(|e| ApiError::validation_failed(&e))?;
    Ok(draft)
}
