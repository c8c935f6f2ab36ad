#![forbid(unsafe_code)]
//! Record listing queries and the SQLite record store.
//!
//! [`build_list_query`] turns optional filters and a sort directive into one
//! parameterized statement; [`RecordStore`] executes it together with inserts
//! and single-record lookups.

mod builder;
mod filters;
mod row_decode;
mod schema;
mod store;
mod store_error;

pub use builder::{build_list_query, ListQuery};
pub use filters::{
    escape_glob, FilterColumn, MatchMode, Predicate, RecordFilter, SortColumn, SortDirective,
    SortOrder,
};
pub use row_decode::RECORD_COLUMNS;
pub use schema::RECORDS_TABLE_SQL;
pub use store::RecordStore;
pub use store_error::{StoreError, StoreErrorCode};

pub const CRATE_NAME: &str = "taller-query";
