// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff and rider registration.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;

use courier_domain::{RiderId, StaffId, StaffRole};

use crate::backend::PersistenceBackend;
use crate::data_models::{bool_to_int, format_timestamp};
use crate::diesel_schema::{riders, staff};
use crate::error::PersistenceError;

/// Creates a staff record.
///
/// # Errors
///
/// Returns `PersistenceError::Duplicate` if the phone number is taken.
pub fn create_staff(
    conn: &mut SqliteConnection,
    full_name: &str,
    phone: &str,
    role: StaffRole,
    now: OffsetDateTime,
) -> Result<StaffId, PersistenceError> {
    diesel::insert_into(staff::table)
        .values((
            staff::full_name.eq(full_name),
            staff::phone.eq(phone),
            staff::role.eq(role.as_str()),
            staff::is_active.eq(1),
            staff::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let staff_id: StaffId = StaffId::new(conn.get_last_insert_rowid()?);
    info!(staff_id = staff_id.value(), role = role.as_str(), "Staff registered");
    Ok(staff_id)
}

/// Creates an active rider.
///
/// # Errors
///
/// Returns `PersistenceError::Duplicate` if the phone number is taken.
pub fn create_rider(
    conn: &mut SqliteConnection,
    full_name: &str,
    phone: &str,
    vehicle_details: Option<&str>,
    now: OffsetDateTime,
) -> Result<RiderId, PersistenceError> {
    diesel::insert_into(riders::table)
        .values((
            riders::full_name.eq(full_name),
            riders::phone.eq(phone),
            riders::vehicle_details.eq(vehicle_details),
            riders::is_active.eq(1),
            riders::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let rider_id: RiderId = RiderId::new(conn.get_last_insert_rowid()?);
    info!(rider_id = rider_id.value(), "Rider registered");
    Ok(rider_id)
}

/// Activates or deactivates a rider.
///
/// Existing assignments are left alone; an inactive rider only stops
/// receiving new ones.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the rider does not exist.
pub fn set_rider_active(
    conn: &mut SqliteConnection,
    rider_id: RiderId,
    active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(riders::table)
        .filter(riders::rider_id.eq(rider_id.value()))
        .set(riders::is_active.eq(bool_to_int(active)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("rider {rider_id}")));
    }

    info!(rider_id = rider_id.value(), active, "Rider activity changed");
    Ok(())
}
