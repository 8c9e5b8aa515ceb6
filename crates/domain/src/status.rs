// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parcel status states and the transition table.
//!
//! The standard table is the only thing a generic status update may use.
//! Rider hand-off and delivery retry are separate, explicitly enumerated
//! routes so that every edge a parcel can take is listed here.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The lifecycle status of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParcelStatus {
    /// Accepted at the intake counter.
    Received,
    /// Labelled and sorted at the origin facility.
    Processing,
    /// Left the origin facility.
    InTransit,
    /// Arrived at the destination hub.
    ArrivedAtHub,
    /// With a rider on the way to the receiver.
    OutForDelivery,
    /// A delivery attempt did not complete.
    DeliveryAttempted,
    /// Handed over to the receiver.
    Delivered,
    /// Sent back to the sender.
    Returned,
    /// Cancelled before delivery.
    Cancelled,
}

/// Which edge family a transition is requested on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRoute {
    /// The generic status table.
    Standard,
    /// Rider assignment or OTP confirmation putting the parcel on the road.
    Handoff,
    /// A failed delivery sent back out for another attempt.
    Retry,
}

impl ParcelStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Received,
        Self::Processing,
        Self::InTransit,
        Self::ArrivedAtHub,
        Self::OutForDelivery,
        Self::DeliveryAttempted,
        Self::Delivered,
        Self::Returned,
        Self::Cancelled,
    ];

    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::Processing => "PROCESSING",
            Self::InTransit => "IN_TRANSIT",
            Self::ArrivedAtHub => "ARRIVED_AT_HUB",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::DeliveryAttempted => "DELIVERY_ATTEMPTED",
            Self::Delivered => "DELIVERED",
            Self::Returned => "RETURNED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if no transition may leave this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Returned | Self::Cancelled)
    }

    /// Returns true if first entry into this status marks the parcel as dispatched.
    #[must_use]
    pub const fn is_dispatch_milestone(&self) -> bool {
        matches!(self, Self::InTransit | Self::OutForDelivery)
    }

    /// Statuses reachable from this one on the standard table.
    #[must_use]
    pub const fn standard_targets(&self) -> &'static [Self] {
        match self {
            Self::Received => &[Self::Processing, Self::Cancelled],
            Self::Processing => &[Self::InTransit, Self::Cancelled],
            Self::InTransit => &[Self::ArrivedAtHub, Self::Cancelled],
            Self::ArrivedAtHub => &[Self::OutForDelivery, Self::Cancelled],
            Self::OutForDelivery => &[Self::DeliveryAttempted, Self::Delivered, Self::Returned],
            Self::DeliveryAttempted => &[Self::OutForDelivery, Self::Delivered, Self::Returned],
            Self::Delivered | Self::Returned | Self::Cancelled => &[],
        }
    }

    /// Returns true if the edge `self -> target` exists on the given route.
    #[must_use]
    pub fn permits(&self, target: Self, route: TransitionRoute) -> bool {
        if self.is_terminal() {
            return false;
        }
        match route {
            TransitionRoute::Standard => self.standard_targets().contains(&target),
            TransitionRoute::Handoff => {
                target == Self::OutForDelivery
                    && matches!(
                        self,
                        Self::Processing
                            | Self::InTransit
                            | Self::ArrivedAtHub
                            | Self::OutForDelivery
                            | Self::DeliveryAttempted
                    )
            }
            TransitionRoute::Retry => {
                target == Self::OutForDelivery
                    && matches!(self, Self::OutForDelivery | Self::DeliveryAttempted)
            }
        }
    }

    /// Validates an edge, returning the error a caller should surface.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the edge is not on the route.
    pub fn validate_transition(
        &self,
        target: Self,
        route: TransitionRoute,
    ) -> Result<(), DomainError> {
        if self.permits(target, route) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }
}

/// Returns true iff `from -> to` is on the standard transition table.
#[must_use]
pub fn can_transition(from: ParcelStatus, to: ParcelStatus) -> bool {
    from.permits(to, TransitionRoute::Standard)
}

impl FromStr for ParcelStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}

impl std::fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of the delivery cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryOutcome {
    #[default]
    Pending,
    Success,
    Failed,
}

impl DeliveryOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl FromStr for DeliveryOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            _ => Err(DomainError::InvalidOutcome(s.to_string())),
        }
    }
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result reported by a rider for a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptOutcome {
    Success,
    Failed,
}

impl AttemptOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl FromStr for AttemptOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            _ => Err(DomainError::InvalidOutcome(s.to_string())),
        }
    }
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
