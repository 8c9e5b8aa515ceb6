// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tracking trail types for the courier parcel lifecycle engine.
//!
//! Every accepted status change produces exactly one tracking event.
//! Events are immutable once written and are never reordered or deleted
//! while their parcel exists.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use courier_domain::{DomainError, ParcelId, ParcelStatus, RiderId, StaffId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Who caused a tracking event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "staff_id", rename_all = "snake_case")]
pub enum Actor {
    /// A staff member acting through the back office.
    Staff(StaffId),
    /// The engine itself, e.g. an OTP confirmation.
    System,
    /// An unauthenticated party such as the receiver.
    Public,
}

impl Actor {
    /// Returns the persisted discriminator for this actor.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Staff(_) => "staff",
            Self::System => "system",
            Self::Public => "public",
        }
    }

    /// Returns the staff reference, if any.
    #[must_use]
    pub const fn staff_id(&self) -> Option<StaffId> {
        match self {
            Self::Staff(id) => Some(*id),
            Self::System | Self::Public => None,
        }
    }

    /// Rebuilds an actor from its persisted columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is unknown or a staff actor has no id.
    pub fn from_parts(kind: &str, staff_id: Option<i64>) -> Result<Self, DomainError> {
        match (kind, staff_id) {
            ("staff", Some(id)) => Ok(Self::Staff(StaffId::new(id))),
            ("system", _) => Ok(Self::System),
            ("public", _) => Ok(Self::Public),
            _ => Err(DomainError::InvariantViolation(format!(
                "unknown actor kind '{kind}'"
            ))),
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Staff(id) => write!(f, "staff:{id}"),
            Self::System => f.write_str("system"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// A tracking event that has been decided but not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrackingEvent {
    /// The parcel this event belongs to.
    pub parcel_id: ParcelId,
    /// The parcel status after the change.
    pub status: ParcelStatus,
    /// Where the parcel was when the change happened.
    pub location: String,
    /// Free-text note shown on the public timeline.
    pub note: Option<String>,
    /// Who caused the change.
    pub actor: Actor,
    /// The rider involved, if any.
    pub rider: Option<RiderId>,
    /// When the event happened.
    pub created_at: OffsetDateTime,
}

/// An immutable entry in a parcel's tracking history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub event_id: i64,
    pub parcel_id: ParcelId,
    pub status: ParcelStatus,
    pub location: String,
    pub note: Option<String>,
    pub actor: Actor,
    pub rider: Option<RiderId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TrackingEvent {
    /// Attaches the identifier assigned by the store.
    #[must_use]
    pub fn from_new(event_id: i64, event: NewTrackingEvent) -> Self {
        Self {
            event_id,
            parcel_id: event.parcel_id,
            status: event.status,
            location: event.location,
            note: event.note,
            actor: event.actor,
            rider: event.rider,
            created_at: event.created_at,
        }
    }
}

/// Checks that a history is a valid trail for a parcel in `current_status`.
///
/// The history must be non-empty, non-decreasing in time and end on the
/// current status.
#[must_use]
pub fn is_consistent_history(history: &[TrackingEvent], current_status: ParcelStatus) -> bool {
    let ordered = history
        .windows(2)
        .all(|pair| pair[0].created_at <= pair[1].created_at && pair[0].event_id < pair[1].event_id);
    ordered && history.last().is_some_and(|last| last.status == current_status)
}
