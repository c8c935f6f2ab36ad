// SPDX-License-Identifier: Apache-2.0

use taller_model::{Folio, Record};

/// Column order shared by every record SELECT.
pub const RECORD_COLUMNS: [&str; 8] = [
    "folio",
    "unit",
    "measure_type",
    "measure_value",
    "date",
    "order_type",
    "comments",
    "reported_by",
];

pub fn record_from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        folio: Folio::new(row.get::<_, i64>(0)?),
        unit: row.get::<_, String>(1)?,
        measure_type: row.get::<_, String>(2)?,
        measure_value: row.get::<_, String>(3)?,
        date: row.get::<_, String>(4)?,
        order_type: row.get::<_, String>(5)?,
        comments: row.get::<_, Option<String>>(6)?,
        reported_by: row.get::<_, String>(7)?,
    })
}
