// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taller_model::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidPathParameter,
    InvalidRequestBody,
    ValidationFailed,
    NotFound,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPathParameter => "InvalidPathParameter",
            Self::InvalidRequestBody => "InvalidRequestBody",
            Self::ValidationFailed => "ValidationFailed",
            Self::NotFound => "NotFound",
            Self::Internal => "Internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn invalid_path_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidPathParameter,
            format!("invalid path parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn invalid_body(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidRequestBody,
            "invalid request body",
            json!({"reason": reason}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn validation_failed(err: &ValidationError) -> Self {
        let field_errors: Vec<Value> = err
            .field_errors
            .iter()
            .map(|e| json!({"field": e.field, "reason": e.reason}))
            .collect();
        Self::new(
            ApiErrorCode::ValidationFailed,
            err.to_string(),
            json!({"field_errors": field_errors}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn not_found(message: &str) -> Self {
        Self::new(ApiErrorCode::NotFound, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn internal(message: &str) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}), "req-unknown")
    }

    /// Wire shape: `{"error": {...}}`.
    #[must_use]
    pub fn envelope(&self) -> Value {
        json!({ "error": self })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
