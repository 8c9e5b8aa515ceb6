// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversion into domain values.
//!
//! Timestamps are stored as RFC 3339 text. Booleans are stored as integers.

use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use courier_audit::{Actor, TrackingEvent};
use courier_domain::{
    Assignment, AttemptOutcome, DeliveryAttempt, DeliveryOutcome, Money, OtpChallenge, Parcel,
    ParcelId, ParcelStatus, Party, Rider, RiderId, Staff, StaffId, StaffRole, TrackingCode,
};

use crate::diesel_schema::{
    assignments, delivery_attempts, otp_challenges, parcels, riders, staff, tracking_events,
};
use crate::error::PersistenceError;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(at.format(&Rfc3339)?)
}

/// Formats an optional timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_optional_timestamp(
    at: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    at.map(format_timestamp).transpose()
}

fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(raw, &Rfc3339)?)
}

fn parse_optional_timestamp(raw: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    raw.map(parse_timestamp).transpose()
}

pub const fn bool_to_int(value: bool) -> i32 {
    if value { 1 } else { 0 }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = parcels)]
pub struct ParcelRow {
    pub parcel_id: i64,
    pub tracking_code: String,
    pub sender_name: String,
    pub sender_phone: String,
    pub sender_location: Option<String>,
    pub sender_country_code: Option<String>,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_location: Option<String>,
    pub receiver_country_code: Option<String>,
    pub parcel_type: String,
    pub declared_value_minor: i64,
    pub declared_value_currency: String,
    pub amount_paid_minor: i64,
    pub amount_paid_currency: String,
    pub special_instructions: Option<String>,
    pub received_by: i64,
    pub received_at: String,
    pub current_status: String,
    pub dispatched: i32,
    pub dispatched_at: Option<String>,
    pub delivered: i32,
    pub delivered_at: Option<String>,
    pub delivery_outcome: String,
    pub failure_reason: Option<String>,
    pub version: i64,
    pub updated_at: String,
}

impl TryFrom<ParcelRow> for Parcel {
    type Error = PersistenceError;

    fn try_from(row: ParcelRow) -> Result<Self, Self::Error> {
        Ok(Self {
            parcel_id: ParcelId::new(row.parcel_id),
            tracking_code: TrackingCode::parse(&row.tracking_code)?,
            sender: Party::new(
                row.sender_name,
                row.sender_phone,
                row.sender_location,
                row.sender_country_code,
            ),
            receiver: Party::new(
                row.receiver_name,
                row.receiver_phone,
                row.receiver_location,
                row.receiver_country_code,
            ),
            parcel_type: row.parcel_type,
            declared_value: Money::new(row.declared_value_minor, &row.declared_value_currency),
            amount_paid: Money::new(row.amount_paid_minor, &row.amount_paid_currency),
            special_instructions: row.special_instructions,
            received_by: StaffId::new(row.received_by),
            received_at: parse_timestamp(&row.received_at)?,
            current_status: row.current_status.parse::<ParcelStatus>()?,
            dispatched: row.dispatched != 0,
            dispatched_at: parse_optional_timestamp(row.dispatched_at.as_deref())?,
            delivered: row.delivered != 0,
            delivered_at: parse_optional_timestamp(row.delivered_at.as_deref())?,
            delivery_outcome: row.delivery_outcome.parse::<DeliveryOutcome>()?,
            failure_reason: row.failure_reason,
            version: row.version,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = tracking_events)]
pub struct TrackingEventRow {
    pub event_id: i64,
    pub parcel_id: i64,
    pub status: String,
    pub location: String,
    pub note: Option<String>,
    pub actor_kind: String,
    pub actor_staff_id: Option<i64>,
    pub rider_id: Option<i64>,
    pub created_at: String,
}

impl TryFrom<TrackingEventRow> for TrackingEvent {
    type Error = PersistenceError;

    fn try_from(row: TrackingEventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            event_id: row.event_id,
            parcel_id: ParcelId::new(row.parcel_id),
            status: row.status.parse::<ParcelStatus>()?,
            location: row.location,
            note: row.note,
            actor: Actor::from_parts(&row.actor_kind, row.actor_staff_id)?,
            rider: row.rider_id.map(RiderId::new),
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = otp_challenges)]
pub struct OtpChallengeRow {
    pub challenge_id: i64,
    pub parcel_id: i64,
    pub code_hash: String,
    pub created_at: String,
    pub expires_at: String,
    pub consumed_at: Option<String>,
}

impl TryFrom<OtpChallengeRow> for OtpChallenge {
    type Error = PersistenceError;

    fn try_from(row: OtpChallengeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            challenge_id: row.challenge_id,
            parcel_id: ParcelId::new(row.parcel_id),
            code_hash: row.code_hash,
            created_at: parse_timestamp(&row.created_at)?,
            expires_at: parse_timestamp(&row.expires_at)?,
            consumed_at: parse_optional_timestamp(row.consumed_at.as_deref())?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = assignments)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub parcel_id: i64,
    pub rider_id: i64,
    pub assigned_by: i64,
    pub assigned_at: String,
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = PersistenceError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            assignment_id: row.assignment_id,
            parcel_id: ParcelId::new(row.parcel_id),
            rider_id: RiderId::new(row.rider_id),
            assigned_by: StaffId::new(row.assigned_by),
            assigned_at: parse_timestamp(&row.assigned_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = delivery_attempts)]
pub struct DeliveryAttemptRow {
    pub attempt_id: i64,
    pub parcel_id: i64,
    pub rider_id: Option<i64>,
    pub outcome: String,
    pub note: Option<String>,
    pub attempted_at: String,
}

impl TryFrom<DeliveryAttemptRow> for DeliveryAttempt {
    type Error = PersistenceError;

    fn try_from(row: DeliveryAttemptRow) -> Result<Self, Self::Error> {
        Ok(Self {
            attempt_id: row.attempt_id,
            parcel_id: ParcelId::new(row.parcel_id),
            rider_id: row.rider_id.map(RiderId::new),
            outcome: row.outcome.parse::<AttemptOutcome>()?,
            note: row.note,
            attempted_at: parse_timestamp(&row.attempted_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = riders)]
pub struct RiderRow {
    pub rider_id: i64,
    pub full_name: String,
    pub phone: String,
    pub vehicle_details: Option<String>,
    pub is_active: i32,
}

impl From<RiderRow> for Rider {
    fn from(row: RiderRow) -> Self {
        Self {
            rider_id: RiderId::new(row.rider_id),
            full_name: row.full_name,
            phone: row.phone,
            vehicle_details: row.vehicle_details,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = staff)]
pub struct StaffRow {
    pub staff_id: i64,
    pub full_name: String,
    pub phone: String,
    pub role: String,
    pub is_active: i32,
}

impl TryFrom<StaffRow> for Staff {
    type Error = PersistenceError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        Ok(Self {
            staff_id: StaffId::new(row.staff_id),
            full_name: row.full_name,
            phone: row.phone,
            role: row.role.parse::<StaffRole>()?,
            is_active: row.is_active != 0,
        })
    }
}
