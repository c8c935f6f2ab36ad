// SPDX-License-Identifier: Apache-2.0

use crate::filters::{
    escape_glob, MatchMode, Predicate, RecordFilter, SortColumn, SortDirective, SortOrder,
};
use crate::row_decode::RECORD_COLUMNS;
use rusqlite::types::Value;

/// Assembled listing statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub sql: String,
    pub params: Vec<Value>,
    pub predicates: Vec<Predicate>,
    pub order: Option<(SortColumn, SortOrder)>,
}

impl ListQuery {
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.predicates.len()
    }
}

#[must_use]
pub fn build_list_query(filter: &RecordFilter, sort: &SortDirective) -> ListQuery {
    let predicates = filter.predicates();
    let mut sql = format!("SELECT {} FROM records", RECORD_COLUMNS.join(", "));
    let mut where_parts: Vec<String> = Vec::with_capacity(predicates.len());
    let mut params: Vec<Value> = Vec::with_capacity(predicates.len());

    for p in &predicates {
        match p.mode {
            MatchMode::Substring => {
                where_parts.push(format!("{} GLOB ?", p.column.as_sql()));
                params.push(Value::Text(format!("*{}*", escape_glob(&p.value))));
            }
            MatchMode::Equals => {
                where_parts.push(format!("{} = ?", p.column.as_sql()));
                params.push(Value::Text(p.value.clone()));
            }
        }
    }

    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }

    let order = sort.resolve();
    if let Some((column, direction)) = order {
        sql.push_str(&format!(" ORDER BY {} {}", column.as_sql(), direction.as_sql()));
        if column != SortColumn::Folio {
            sql.push_str(", folio ASC");
        }
    }

    ListQuery {
        sql,
        params,
        predicates,
        order,
    }
}

#[must_use]
pub fn fetch_by_folio_sql() -> String {
    format!(
        "SELECT {} FROM records WHERE folio = ?1",
        RECORD_COLUMNS.join(", ")
    )
}

pub const INSERT_RECORD_SQL: &str = "INSERT INTO records (
  unit, measure_type, measure_value, date, order_type, comments, reported_by
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(unit: Option<&str>, order_type: Option<&str>, date: Option<&str>) -> RecordFilter {
        RecordFilter {
            unit: unit.map(ToString::to_string),
            order_type: order_type.map(ToString::to_string),
            date: date.map(ToString::to_string),
        }
    }

    #[test]
    fn no_filters_select_everything_in_natural_order() {
        let q = build_list_query(&RecordFilter::default(), &SortDirective::default());
        assert_eq!(
            q.sql,
            "SELECT folio, unit, measure_type, measure_value, date, order_type, comments, reported_by FROM records"
        );
        assert!(q.params.is_empty());
        assert_eq!(q.condition_count(), 0);
    }

    #[test]
    fn all_filters_are_and_combined_with_bound_values() {
        let q = build_list_query(
            &filter(Some("10"), Some("Prev"), Some("2024-05-01")),
            &SortDirective::default(),
        );
        assert!(q
            .sql
            .ends_with(" WHERE unit GLOB ? AND order_type GLOB ? AND date = ?"));
        assert_eq!(
            q.params,
            vec![
                Value::Text("*10*".to_string()),
                Value::Text("*Prev*".to_string()),
                Value::Text("2024-05-01".to_string()),
            ]
        );
    }

    #[test]
    fn caller_values_never_reach_sql_text() {
        let hostile = "x' OR '1'='1";
        let q = build_list_query(
            &filter(Some(hostile), None, Some(hostile)),
            &SortDirective::new(Some(hostile), Some(hostile)),
        );
        assert!(!q.sql.contains(hostile));
        assert!(!q.sql.contains("ORDER BY"));
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn whitelisted_sort_appends_order_clause() {
        let q = build_list_query(
            &RecordFilter::default(),
            &SortDirective::new(Some("folio"), Some("desc")),
        );
        assert!(q.sql.ends_with(" ORDER BY folio DESC"));

        let q = build_list_query(
            &RecordFilter::default(),
            &SortDirective::new(Some("date"), Some("up")),
        );
        assert!(q.sql.ends_with(" ORDER BY date ASC, folio ASC"));
    }

    #[test]
    fn order_without_sort_by_is_ignored() {
        let q = build_list_query(
            &RecordFilter::default(),
            &SortDirective::new(None, Some("desc")),
        );
        assert!(!q.sql.contains("ORDER BY"));
        assert_eq!(q.order, None);
    }
}
