// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::ParcelStatus;
use crate::types::RiderId;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A person or business name is empty or invalid.
    InvalidName(String),
    /// A phone number is empty or contains invalid characters.
    InvalidPhone(String),
    /// A location string is empty.
    InvalidLocation(String),
    /// A monetary amount is negative.
    InvalidAmount(i64),
    /// A currency code is not three ASCII letters.
    InvalidCurrency(String),
    /// A parcel type is empty.
    InvalidParcelType(String),
    /// A tracking code does not match the expected format.
    InvalidTrackingCode(String),
    /// A status string does not name a known status.
    InvalidStatus(String),
    /// An outcome string does not name a known outcome.
    InvalidOutcome(String),
    /// A staff role string does not name a known role.
    InvalidRole(String),
    /// A failure reason is empty.
    InvalidFailureReason(String),
    /// The requested status change is not on the transition table.
    InvalidTransition {
        /// The current status.
        from: ParcelStatus,
        /// The requested status.
        to: ParcelStatus,
    },
    /// The rider has been deactivated and cannot take assignments.
    RiderInactive(RiderId),
    /// A parcel's fields contradict each other.
    InvariantViolation(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidPhone(msg) => write!(f, "Invalid phone number: {msg}"),
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidAmount(amount) => {
                write!(f, "Invalid amount: {amount} (must not be negative)")
            }
            Self::InvalidCurrency(code) => write!(f, "Invalid currency code: '{code}'"),
            Self::InvalidParcelType(msg) => write!(f, "Invalid parcel type: {msg}"),
            Self::InvalidTrackingCode(code) => write!(f, "Invalid tracking code: '{code}'"),
            Self::InvalidStatus(status) => write!(f, "Invalid parcel status: '{status}'"),
            Self::InvalidOutcome(outcome) => write!(f, "Invalid outcome: '{outcome}'"),
            Self::InvalidRole(role) => write!(f, "Invalid staff role: '{role}'"),
            Self::InvalidFailureReason(msg) => write!(f, "Invalid failure reason: {msg}"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Cannot transition from {from} to {to}")
            }
            Self::RiderInactive(rider_id) => write!(f, "Rider {rider_id} is inactive"),
            Self::InvariantViolation(msg) => write!(f, "Parcel invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
