// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use courier_domain::{DeliveryAttempt, ParcelId};

use crate::data_models::DeliveryAttemptRow;
use crate::diesel_schema::delivery_attempts;
use crate::error::PersistenceError;

/// Retrieves the delivery attempts recorded for a parcel, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_attempts(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
) -> Result<Vec<DeliveryAttempt>, PersistenceError> {
    let rows: Vec<DeliveryAttemptRow> = delivery_attempts::table
        .filter(delivery_attempts::parcel_id.eq(parcel_id.value()))
        .order(delivery_attempts::attempt_id.asc())
        .select(DeliveryAttemptRow::as_select())
        .load(conn)?;

    rows.into_iter().map(DeliveryAttempt::try_from).collect()
}
