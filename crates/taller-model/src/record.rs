// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// Calendar format of [`Record::date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Creation fields that must carry a non-blank value, in report order.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "unit",
    "measureType",
    "measureValue",
    "orderType",
    "reportedBy",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Folio(i64);

impl Folio {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parses a path segment such as `"17"`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(Self)
    }

    #[must_use]
    pub fn document_filename(self) -> String {
        format!("registro_{}.pdf", self.0)
    }
}

impl Display for Folio {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub folio: Folio,
    pub unit: String,
    pub measure_type: String,
    pub measure_value: String,
    pub date: String,
    pub order_type: String,
    pub comments: Option<String>,
    pub reported_by: String,
}

/// Caller-supplied creation input. Absent or `null` text fields decode as
/// empty strings so that [`RecordDraft::validate`] reports them uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub unit: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub measure_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub measure_value: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub order_type: String,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reported_by: String,
}

impl RecordDraft {
    /// Returns every missing required field at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let values = [
            &self.unit,
            &self.measure_type,
            &self.measure_value,
            &self.order_type,
            &self.reported_by,
        ];
        let field_errors: Vec<FieldError> = REQUIRED_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| FieldError::missing(field))
            .collect();
        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { field_errors })
        }
    }

    /// Comments as persisted: blank text is stored as absent.
    #[must_use]
    pub fn stored_comments(&self) -> Option<&str> {
        self.comments
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReceipt {
    pub folio: Folio,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: "required".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field_errors: Vec<FieldError>,
}

impl ValidationError {
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.field_errors.iter().map(|e| e.field.as_str()).collect()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing required fields: {}", self.fields().join(", "))
    }
}

impl std::error::Error for ValidationError {}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
