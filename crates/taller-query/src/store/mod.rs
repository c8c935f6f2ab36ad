// SPDX-License-Identifier: Apache-2.0

use crate::builder::{build_list_query, fetch_by_folio_sql, INSERT_RECORD_SQL};
use crate::filters::{RecordFilter, SortDirective};
use crate::row_decode::record_from_sql_row;
use crate::schema::apply_schema;
use crate::store_error::{StoreError, StoreErrorCode};
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use taller_model::{Folio, Record, RecordDraft, RecordReceipt, DATE_FORMAT};
use tracing::debug;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed record store. One connection, serialized behind a mutex, so
/// folio assignment is atomic and strictly increasing.
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| {
            StoreError::backend(
                StoreErrorCode::Open,
                format!("open {}: {e}", path.display()),
            )
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| StoreError::backend(StoreErrorCode::Open, e.to_string()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::backend(StoreErrorCode::Open, e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        apply_schema(&conn)
            .map_err(|e| StoreError::backend(StoreErrorCode::Schema, e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| {
            StoreError::backend(StoreErrorCode::Unavailable, "store connection lock poisoned")
        })
    }

    /// Validates the draft, then persists it dated `today`.
    pub fn insert(&self, draft: &RecordDraft, today: NaiveDate) -> Result<RecordReceipt, StoreError> {
        draft.validate()?;
        let date = today.format(DATE_FORMAT).to_string();
        let conn = self.lock()?;
        conn.execute(
            INSERT_RECORD_SQL,
            params![
                draft.unit,
                draft.measure_type,
                draft.measure_value,
                date,
                draft.order_type,
                draft.stored_comments(),
                draft.reported_by,
            ],
        )
        .map_err(|e| StoreError::backend(StoreErrorCode::Write, e.to_string()))?;
        let folio = Folio::new(conn.last_insert_rowid());
        debug!(%folio, "record inserted");
        Ok(RecordReceipt { folio, date })
    }

    pub fn list(
        &self,
        filter: &RecordFilter,
        sort: &SortDirective,
    ) -> Result<Vec<Record>, StoreError> {
        let query = build_list_query(filter, sort);
        debug!(sql = %query.sql, conditions = query.condition_count(), "list query built");
        let sql_err = |e: rusqlite::Error| StoreError::backend(StoreErrorCode::Query, e.to_string());
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&query.sql).map_err(sql_err)?;
        let rows = stmt
            .query_map(params_from_iter(query.params.iter()), record_from_sql_row)
            .map_err(sql_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
    }

    pub fn fetch(&self, folio: Folio) -> Result<Option<Record>, StoreError> {
        let conn = self.lock()?;
        conn.query_row(&fetch_by_folio_sql(), [folio.get()], record_from_sql_row)
            .optional()
            .map_err(|e| StoreError::backend(StoreErrorCode::Query, e.to_string()))
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .map_err(|e| StoreError::backend(StoreErrorCode::Query, e.to_string()))?;
        Ok(u64::try_from(n).unwrap_or(0))
    }
}
