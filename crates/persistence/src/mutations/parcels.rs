// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use courier_domain::{Parcel, ParcelId};

use crate::backend::PersistenceBackend;
use crate::data_models::{bool_to_int, format_optional_timestamp, format_timestamp};
use crate::diesel_schema::parcels;
use crate::error::PersistenceError;

/// Inserts a new parcel and returns its id.
///
/// The parcel's own id and version are ignored; the row starts at version 0.
///
/// # Errors
///
/// Returns `PersistenceError::Duplicate` if the tracking code is taken.
pub fn insert_parcel(conn: &mut SqliteConnection, parcel: &Parcel) -> Result<ParcelId, PersistenceError> {
    diesel::insert_into(parcels::table)
        .values((
            parcels::tracking_code.eq(parcel.tracking_code.as_str()),
            parcels::sender_name.eq(&parcel.sender.name),
            parcels::sender_phone.eq(&parcel.sender.phone),
            parcels::sender_location.eq(&parcel.sender.location),
            parcels::sender_country_code.eq(&parcel.sender.country_code),
            parcels::receiver_name.eq(&parcel.receiver.name),
            parcels::receiver_phone.eq(&parcel.receiver.phone),
            parcels::receiver_location.eq(&parcel.receiver.location),
            parcels::receiver_country_code.eq(&parcel.receiver.country_code),
            parcels::parcel_type.eq(&parcel.parcel_type),
            parcels::declared_value_minor.eq(parcel.declared_value.amount_minor),
            parcels::declared_value_currency.eq(&parcel.declared_value.currency),
            parcels::amount_paid_minor.eq(parcel.amount_paid.amount_minor),
            parcels::amount_paid_currency.eq(&parcel.amount_paid.currency),
            parcels::special_instructions.eq(&parcel.special_instructions),
            parcels::received_by.eq(parcel.received_by.value()),
            parcels::received_at.eq(format_timestamp(parcel.received_at)?),
            parcels::current_status.eq(parcel.current_status.as_str()),
            parcels::dispatched.eq(bool_to_int(parcel.dispatched)),
            parcels::dispatched_at.eq(format_optional_timestamp(parcel.dispatched_at)?),
            parcels::delivered.eq(bool_to_int(parcel.delivered)),
            parcels::delivered_at.eq(format_optional_timestamp(parcel.delivered_at)?),
            parcels::delivery_outcome.eq(parcel.delivery_outcome.as_str()),
            parcels::failure_reason.eq(&parcel.failure_reason),
            parcels::version.eq(0_i64),
            parcels::updated_at.eq(format_timestamp(parcel.updated_at)?),
        ))
        .execute(conn)?;

    let parcel_id: ParcelId = ParcelId::new(conn.get_last_insert_rowid()?);
    info!(
        parcel_id = parcel_id.value(),
        tracking_code = %parcel.tracking_code,
        "Parcel inserted"
    );
    Ok(parcel_id)
}

/// Writes the mutable fields of a parcel if nobody else has since.
///
/// `parcel.version` must be the version that was loaded. On success the
/// stored version is one higher and that value is returned.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the stored version differs.
pub fn update_parcel_versioned(
    conn: &mut SqliteConnection,
    parcel: &Parcel,
) -> Result<i64, PersistenceError> {
    let next_version: i64 = parcel.version + 1;

    let updated: usize = diesel::update(parcels::table)
        .filter(parcels::parcel_id.eq(parcel.parcel_id.value()))
        .filter(parcels::version.eq(parcel.version))
        .set((
            parcels::current_status.eq(parcel.current_status.as_str()),
            parcels::dispatched.eq(bool_to_int(parcel.dispatched)),
            parcels::dispatched_at.eq(format_optional_timestamp(parcel.dispatched_at)?),
            parcels::delivered.eq(bool_to_int(parcel.delivered)),
            parcels::delivered_at.eq(format_optional_timestamp(parcel.delivered_at)?),
            parcels::delivery_outcome.eq(parcel.delivery_outcome.as_str()),
            parcels::failure_reason.eq(&parcel.failure_reason),
            parcels::version.eq(next_version),
            parcels::updated_at.eq(format_timestamp(parcel.updated_at)?),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::Conflict(format!(
            "parcel {} is no longer at version {}",
            parcel.parcel_id, parcel.version
        )));
    }

    debug!(
        parcel_id = parcel.parcel_id.value(),
        status = parcel.current_status.as_str(),
        version = next_version,
        "Parcel updated"
    );
    Ok(next_version)
}
