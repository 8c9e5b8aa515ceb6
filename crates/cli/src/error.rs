// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use courier_lifecycle::{ErrorKind, LifecycleError};
use courier_persistence::PersistenceError;
use serde::Serialize;

/// A failed command, ready to be printed and turned into an exit status.
#[derive(Debug)]
pub struct CliError {
    pub exit_code: u8,
    pub kind: &'static str,
    pub message: String,
}

/// Error body printed on stdout.
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: bool,
    pub kind: &'a str,
    pub message: &'a str,
    pub retryable: bool,
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            exit_code: 2,
            kind: "invalid_request",
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            kind: "internal",
            message: message.into(),
        }
    }

    pub const fn is_retryable(&self) -> bool {
        self.exit_code == 75
    }

    pub fn response(&self) -> ErrorResponse<'_> {
        ErrorResponse {
            error: true,
            kind: self.kind,
            message: &self.message,
            retryable: self.is_retryable(),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for CliError {}

impl From<LifecycleError> for CliError {
    fn from(err: LifecycleError) -> Self {
        let (exit_code, kind): (u8, &'static str) = match err.kind() {
            ErrorKind::Internal => (1, "internal"),
            ErrorKind::InvalidRequest => (2, "invalid_request"),
            ErrorKind::NotFound => (3, "not_found"),
            ErrorKind::InvalidState => (4, "invalid_state"),
            ErrorKind::VerificationFailed => (5, "verification_failed"),
            ErrorKind::Forbidden => (6, "forbidden"),
            // EX_TEMPFAIL
            ErrorKind::Retryable => (75, "conflict"),
        };
        Self {
            exit_code,
            kind,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for CliError {
    fn from(err: PersistenceError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("could not encode output: {err}"))
    }
}
