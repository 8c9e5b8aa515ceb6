// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The parcel aggregate and the records it owns.

use crate::error::DomainError;
use crate::status::{AttemptOutcome, DeliveryOutcome, ParcelStatus};
use crate::types::{Money, ParcelId, Party, RiderId, StaffId, TrackingCode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Intake data for a new parcel, as captured at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParcel {
    pub sender: Party,
    pub receiver: Party,
    pub parcel_type: String,
    pub declared_value: Money,
    pub amount_paid: Money,
    pub special_instructions: Option<String>,
}

/// The parcel aggregate root.
///
/// `version` increases by one on every committed write and is what the store
/// checks to detect concurrent modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub parcel_id: ParcelId,
    pub tracking_code: TrackingCode,
    pub sender: Party,
    pub receiver: Party,
    pub parcel_type: String,
    pub declared_value: Money,
    pub amount_paid: Money,
    pub special_instructions: Option<String>,
    pub received_by: StaffId,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    pub current_status: ParcelStatus,
    pub dispatched: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub dispatched_at: Option<OffsetDateTime>,
    pub delivered: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub delivered_at: Option<OffsetDateTime>,
    pub delivery_outcome: DeliveryOutcome,
    pub failure_reason: Option<String>,
    pub version: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Parcel {
    /// Checks the cross-field invariants of the aggregate.
    ///
    /// - `delivered` iff status is `DELIVERED` iff outcome is `SUCCESS`
    /// - a failure reason only accompanies a `FAILED` outcome
    /// - the dispatch and delivery flags agree with their timestamps
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` describing the first broken rule.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        let status_delivered = self.current_status == ParcelStatus::Delivered;
        let outcome_success = self.delivery_outcome == DeliveryOutcome::Success;
        if self.delivered != status_delivered || status_delivered != outcome_success {
            return Err(DomainError::InvariantViolation(format!(
                "delivered={}, status={}, outcome={}",
                self.delivered, self.current_status, self.delivery_outcome
            )));
        }

        if self.failure_reason.is_some() && self.delivery_outcome != DeliveryOutcome::Failed {
            return Err(DomainError::InvariantViolation(format!(
                "failure reason present with outcome {}",
                self.delivery_outcome
            )));
        }

        if self.dispatched != self.dispatched_at.is_some() {
            return Err(DomainError::InvariantViolation(String::from(
                "dispatched flag disagrees with dispatched_at",
            )));
        }

        if self.delivered != self.delivered_at.is_some() {
            return Err(DomainError::InvariantViolation(String::from(
                "delivered flag disagrees with delivered_at",
            )));
        }

        Ok(())
    }
}

/// A stored delivery-verification challenge.
///
/// Only the salted hash of the code is ever held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub challenge_id: i64,
    pub parcel_id: ParcelId,
    pub code_hash: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub consumed_at: Option<OffsetDateTime>,
}

impl OtpChallenge {
    /// A challenge is open until it is consumed, successfully or not.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.consumed_at.is_none()
    }

    /// Expired means strictly past `expires_at`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }
}

/// The binding of one rider to one parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: i64,
    pub parcel_id: ParcelId,
    pub rider_id: RiderId,
    pub assigned_by: StaffId,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
}

/// A rider's report of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub attempt_id: i64,
    pub parcel_id: ParcelId,
    pub rider_id: Option<RiderId>,
    pub outcome: AttemptOutcome,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub attempted_at: OffsetDateTime,
}
