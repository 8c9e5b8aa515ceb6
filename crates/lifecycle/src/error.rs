// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the lifecycle layer.

use courier::CoreError;
use courier_domain::{DomainError, ParcelStatus, RiderId};
use courier_persistence::PersistenceError;
use thiserror::Error;

/// Broad class of a [`LifecycleError`], for mapping onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced record does not exist.
    NotFound,
    /// The request is malformed or names an unusable record.
    InvalidRequest,
    /// The parcel is not in a state that allows the request. Do not retry.
    InvalidState,
    /// A delivery code could not be verified.
    VerificationFailed,
    /// The caller's role does not permit the operation.
    Forbidden,
    /// Another writer got there first. Retry the whole use case.
    Retryable,
    /// The store or the hashing backend failed.
    Internal,
}

/// Errors returned by lifecycle use cases.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: ParcelStatus, to: ParcelStatus },

    #[error("Rider {0} is inactive")]
    RiderInactive(RiderId),

    #[error("The delivery code has expired")]
    Expired,

    #[error("There is no active delivery code for this parcel")]
    NoActiveChallenge,

    #[error("The delivery code does not match")]
    Mismatch,

    #[error("'{operation}' is not permitted for {role}")]
    Unauthorized { operation: String, role: String },

    #[error("Concurrent modification, retry the request: {0}")]
    Conflict(String),

    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LifecycleError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidState,
            Self::RiderInactive(_) | Self::InvalidInput { .. } => ErrorKind::InvalidRequest,
            Self::Expired | Self::NoActiveChallenge | Self::Mismatch => {
                ErrorKind::VerificationFailed
            }
            Self::Unauthorized { .. } => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Retryable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Retryable)
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Translates a domain error into a lifecycle error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> LifecycleError {
    match err {
        DomainError::InvalidTransition { from, to } => LifecycleError::InvalidTransition { from, to },
        DomainError::RiderInactive(rider_id) => LifecycleError::RiderInactive(rider_id),
        DomainError::InvalidName(msg) => LifecycleError::invalid_input("name", msg),
        DomainError::InvalidPhone(msg) => LifecycleError::invalid_input("phone", msg),
        DomainError::InvalidLocation(msg) => LifecycleError::invalid_input("location", msg),
        DomainError::InvalidAmount(amount) => {
            LifecycleError::invalid_input("amount", format!("{amount} must not be negative"))
        }
        DomainError::InvalidCurrency(code) => {
            LifecycleError::invalid_input("currency", format!("'{code}' is not an ISO 4217 code"))
        }
        DomainError::InvalidParcelType(msg) => LifecycleError::invalid_input("parcel_type", msg),
        DomainError::InvalidTrackingCode(code) => {
            LifecycleError::invalid_input("tracking_code", format!("'{code}' is malformed"))
        }
        DomainError::InvalidStatus(status) => {
            LifecycleError::invalid_input("status", format!("'{status}' is not a parcel status"))
        }
        DomainError::InvalidOutcome(outcome) => {
            LifecycleError::invalid_input("outcome", format!("'{outcome}' is not an outcome"))
        }
        DomainError::InvalidRole(role) => {
            LifecycleError::invalid_input("role", format!("'{role}' is not a staff role"))
        }
        DomainError::InvalidFailureReason(msg) => LifecycleError::invalid_input("reason", msg),
        DomainError::InvariantViolation(msg) => {
            LifecycleError::Internal(format!("parcel invariant violated: {msg}"))
        }
    }
}

/// Translates a core error into a lifecycle error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> LifecycleError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Hashing(msg) => LifecycleError::Internal(format!("code hashing failed: {msg}")),
        CoreError::InvalidConfiguration(msg) => LifecycleError::invalid_input("config", msg),
    }
}

/// Translates a persistence error into a lifecycle error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> LifecycleError {
    match err {
        PersistenceError::NotFound(msg) => LifecycleError::NotFound(msg),
        PersistenceError::Conflict(msg) => LifecycleError::Conflict(msg),
        PersistenceError::Duplicate(msg) => LifecycleError::invalid_input("unique", msg),
        other => LifecycleError::Internal(other.to_string()),
    }
}

impl From<DomainError> for LifecycleError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for LifecycleError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for LifecycleError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}
