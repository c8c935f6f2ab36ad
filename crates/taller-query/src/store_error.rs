// SPDX-License-Identifier: Apache-2.0

use taller_model::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    Validation,
    Open,
    Schema,
    Query,
    Write,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Draft rejected before any database access.
    Invalid(ValidationError),
    Backend {
        code: StoreErrorCode,
        message: String,
    },
}

impl StoreError {
    #[must_use]
    pub fn backend(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self::Backend {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> StoreErrorCode {
        match self {
            Self::Invalid(_) => StoreErrorCode::Validation,
            Self::Backend { code, .. } => *code,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "Validation: {err}"),
            Self::Backend { code, message } => write!(f, "{code:?}: {message}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Backend { .. } => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}
