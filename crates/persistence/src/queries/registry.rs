// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff and rider lookups.

use diesel::SqliteConnection;
use diesel::prelude::*;

use courier_domain::{Rider, RiderId, Staff, StaffId};

use crate::data_models::{RiderRow, StaffRow};
use crate::diesel_schema::{riders, staff};
use crate::error::PersistenceError;

/// Retrieves a rider by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such rider exists.
pub fn get_rider(conn: &mut SqliteConnection, rider_id: RiderId) -> Result<Rider, PersistenceError> {
    let row: Option<RiderRow> = riders::table
        .filter(riders::rider_id.eq(rider_id.value()))
        .select(RiderRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Rider::from)
        .ok_or_else(|| PersistenceError::NotFound(format!("rider {rider_id}")))
}

/// Lists riders ordered by id, optionally only the active ones.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_riders(
    conn: &mut SqliteConnection,
    active_only: bool,
) -> Result<Vec<Rider>, PersistenceError> {
    let rows: Vec<RiderRow> = if active_only {
        riders::table
            .filter(riders::is_active.eq(1))
            .order(riders::rider_id.asc())
            .select(RiderRow::as_select())
            .load(conn)?
    } else {
        riders::table
            .order(riders::rider_id.asc())
            .select(RiderRow::as_select())
            .load(conn)?
    };
    Ok(rows.into_iter().map(Rider::from).collect())
}

/// Retrieves a staff member by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such staff member exists.
pub fn get_staff(conn: &mut SqliteConnection, staff_id: StaffId) -> Result<Staff, PersistenceError> {
    let row: Option<StaffRow> = staff::table
        .filter(staff::staff_id.eq(staff_id.value()))
        .select(StaffRow::as_select())
        .first(conn)
        .optional()?;

    row.map_or_else(
        || Err(PersistenceError::NotFound(format!("staff {staff_id}"))),
        Staff::try_from,
    )
}

/// Counts registered staff, active or not.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_staff(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let count: i64 = staff::table.count().get_result(conn)?;
    Ok(count)
}
