// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for lifecycle use cases.

use courier_audit::TrackingEvent;
use courier_domain::{
    DeliveryOutcome, ParcelId, ParcelStatus, Rider, RiderId, StaffRole, TrackingCode,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Result of a dispatch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub parcel_id: ParcelId,
    /// `true` if the parcel had already been dispatched and nothing changed.
    pub already_dispatched: bool,
    pub status: ParcelStatus,
}

/// Result of a delivery code check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerifyOutcome {
    pub verified: bool,
    /// `true` if the submitted code was wrong and a new one was sent.
    pub rotated: bool,
}

/// Contact details of the rider currently holding a parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiderContact {
    pub rider_id: RiderId,
    pub full_name: String,
    pub phone: String,
    pub vehicle_details: Option<String>,
}

impl From<Rider> for RiderContact {
    fn from(rider: Rider) -> Self {
        Self {
            rider_id: rider.rider_id,
            full_name: rider.full_name,
            phone: rider.phone,
            vehicle_details: rider.vehicle_details,
        }
    }
}

/// Delivery status of a parcel as shown to staff.
///
/// Never carries the delivery code itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryInfo {
    pub parcel_id: ParcelId,
    pub tracking_code: TrackingCode,
    pub status: ParcelStatus,
    pub dispatched: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub dispatched_at: Option<OffsetDateTime>,
    pub delivered: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub delivered_at: Option<OffsetDateTime>,
    pub delivery_outcome: DeliveryOutcome,
    pub failure_reason: Option<String>,
    pub rider: Option<RiderContact>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub assigned_at: Option<OffsetDateTime>,
    pub has_active_otp: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub otp_expires_at: Option<OffsetDateTime>,
}

/// Public view of a parcel, looked up by tracking code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicTracking {
    pub tracking_code: TrackingCode,
    pub status: ParcelStatus,
    pub history: Vec<PublicTrackingEntry>,
}

/// One entry on the public timeline. Omits actor and rider identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicTrackingEntry {
    pub status: ParcelStatus,
    pub location: String,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

impl From<TrackingEvent> for PublicTrackingEntry {
    fn from(event: TrackingEvent) -> Self {
        Self {
            status: event.status,
            location: event.location,
            note: event.note,
            at: event.created_at,
        }
    }
}

/// Request to register a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterStaffRequest {
    pub full_name: String,
    pub phone: String,
    pub role: StaffRole,
}

/// Request to register a rider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRiderRequest {
    pub full_name: String,
    pub phone: String,
    pub vehicle_details: Option<String>,
}

/// Rows removed by a purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurgeOutcome {
    pub parcel_id: ParcelId,
    pub events: usize,
    pub challenges: usize,
    pub assignments: usize,
    pub attempts: usize,
}
