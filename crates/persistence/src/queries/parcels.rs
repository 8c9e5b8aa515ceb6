// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use courier_domain::{Parcel, ParcelId, TrackingCode};

use crate::data_models::ParcelRow;
use crate::diesel_schema::parcels;
use crate::error::PersistenceError;

/// Retrieves a parcel by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such parcel exists.
pub fn get_parcel(conn: &mut SqliteConnection, parcel_id: ParcelId) -> Result<Parcel, PersistenceError> {
    debug!(parcel_id = parcel_id.value(), "Loading parcel");

    let row: Option<ParcelRow> = parcels::table
        .filter(parcels::parcel_id.eq(parcel_id.value()))
        .select(ParcelRow::as_select())
        .first(conn)
        .optional()?;

    row.map_or_else(
        || Err(PersistenceError::NotFound(format!("parcel {parcel_id}"))),
        Parcel::try_from,
    )
}

/// Retrieves a parcel by its public tracking code.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no parcel has the code.
pub fn get_parcel_by_tracking_code(
    conn: &mut SqliteConnection,
    tracking_code: &TrackingCode,
) -> Result<Parcel, PersistenceError> {
    let row: Option<ParcelRow> = parcels::table
        .filter(parcels::tracking_code.eq(tracking_code.as_str()))
        .select(ParcelRow::as_select())
        .first(conn)
        .optional()?;

    row.map_or_else(
        || Err(PersistenceError::NotFound(format!("tracking code {tracking_code}"))),
        Parcel::try_from,
    )
}

/// Returns true if a parcel already uses the tracking code.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn tracking_code_exists(
    conn: &mut SqliteConnection,
    tracking_code: &TrackingCode,
) -> Result<bool, PersistenceError> {
    let count: i64 = parcels::table
        .filter(parcels::tracking_code.eq(tracking_code.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
