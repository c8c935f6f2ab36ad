#![forbid(unsafe_code)]
//! Boundary contract of the records API: error envelope, error codes and
//! the parsing of query strings, path segments and request bodies.

mod error_mapping;
mod errors;
mod params;

pub use error_mapping::{map_error, status_code};
pub use errors::{ApiError, ApiErrorCode};
pub use params::{
    parse_folio_param, parse_list_params, parse_record_draft, ListRecordsParams, LIST_PARAMS,
};

pub const CRATE_NAME: &str = "taller-api";
