#![forbid(unsafe_code)]
//! Workshop order record model.
//!
//! A [`Record`] is created once from a validated [`RecordDraft`], receives its
//! [`Folio`] and date from the store, and is never modified afterwards.

mod record;

pub use record::{
    FieldError, Folio, Record, RecordDraft, RecordReceipt, ValidationError, DATE_FORMAT,
    REQUIRED_FIELDS,
};

pub const CRATE_NAME: &str = "taller-model";
