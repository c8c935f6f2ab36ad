// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::{json, Value};
use taller_query::{StoreError, StoreErrorCode};
use taller_report::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    DependencyFailure = 4,
    Internal = 10,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Usage => "usage",
            Self::Validation => "validation",
            Self::DependencyFailure => "dependency_failure",
            Self::Internal => "internal",
        }
    }
}

/// Machine-readable error printed on stderr when `--json` is set.
#[derive(Debug, Clone, Serialize)]
pub struct MachineError {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub struct CliError {
    pub exit_code: ExitCode,
    pub machine: MachineError,
}

impl CliError {
    pub fn new(exit_code: ExitCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            exit_code,
            machine: MachineError {
                code: exit_code.as_str(),
                message: message.into(),
                details,
            },
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ExitCode::Usage, message, json!({}))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ExitCode::DependencyFailure, message, json!({}))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ExitCode::Internal, message, json!({}))
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::Invalid(invalid) => Self::new(
                ExitCode::Validation,
                invalid.to_string(),
                json!({"fields": invalid.fields()}),
            ),
            StoreError::Backend {
                code: StoreErrorCode::Open | StoreErrorCode::Schema,
                ..
            } => Self::new(ExitCode::DependencyFailure, err.to_string(), json!({})),
            StoreError::Backend { .. } => Self::internal(err.to_string()),
        }
    }
}

impl From<RenderError> for CliError {
    fn from(err: RenderError) -> Self {
        Self::internal(err.to_string())
    }
}

pub fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("error: {}", error.machine.message);
    }
}
