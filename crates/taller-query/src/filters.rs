// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Optional list filters. Empty values are treated as absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub unit: Option<String>,
    pub order_type: Option<String>,
    pub date: Option<String>,
}

impl RecordFilter {
    /// Predicates in fixed column order: unit, orderType, date.
    #[must_use]
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(v) = present(&self.unit) {
            out.push(Predicate::new(FilterColumn::Unit, MatchMode::Substring, v));
        }
        if let Some(v) = present(&self.order_type) {
            out.push(Predicate::new(
                FilterColumn::OrderType,
                MatchMode::Substring,
                v,
            ));
        }
        if let Some(v) = present(&self.date) {
            out.push(Predicate::new(FilterColumn::Date, MatchMode::Equals, v));
        }
        out
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterColumn {
    Unit,
    OrderType,
    Date,
}

impl FilterColumn {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::OrderType => "order_type",
            Self::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-sensitive match anywhere in the column value.
    Substring,
    Equals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: FilterColumn,
    pub mode: MatchMode,
    pub value: String,
}

impl Predicate {
    #[must_use]
    pub fn new(column: FilterColumn, mode: MatchMode, value: &str) -> Self {
        Self {
            column,
            mode,
            value: value.to_string(),
        }
    }
}

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Folio,
    Date,
    Unit,
}

impl SortColumn {
    pub const ALL: [Self; 3] = [Self::Folio, Self::Date, Self::Unit];

    /// Whitelist membership check; anything else yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "folio" => Some(Self::Folio),
            "date" => Some(Self::Date),
            "unit" => Some(Self::Unit),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Folio => "folio",
            Self::Date => "date",
            Self::Unit => "unit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact string `desc` selects descending order.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        if raw == Some("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Raw caller sort input, resolved against the whitelist at build time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SortDirective {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl SortDirective {
    #[must_use]
    pub fn new(sort_by: Option<&str>, order: Option<&str>) -> Self {
        Self {
            sort_by: sort_by.map(ToString::to_string),
            order: order.map(ToString::to_string),
        }
    }

    #[must_use]
    pub fn resolve(&self) -> Option<(SortColumn, SortOrder)> {
        let column = SortColumn::parse(self.sort_by.as_deref()?)?;
        Some((column, SortOrder::parse(self.order.as_deref())))
    }
}

/// Escapes GLOB metacharacters so the value matches literally.
#[must_use]
pub fn escape_glob(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' | '?' | '[' => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            _ => out.push(c),
        }
    }
    out
}
