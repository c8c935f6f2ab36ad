// SPDX-License-Identifier: Apache-2.0

use rusqlite::Connection;

pub const RECORDS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS records (
  folio INTEGER PRIMARY KEY AUTOINCREMENT,
  unit TEXT NOT NULL,
  measure_type TEXT NOT NULL,
  measure_value TEXT NOT NULL,
  date TEXT NOT NULL,
  order_type TEXT NOT NULL,
  comments TEXT,
  reported_by TEXT NOT NULL
)";

/// Idempotent; safe to run on every open.
pub fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(RECORDS_TABLE_SQL)
}
