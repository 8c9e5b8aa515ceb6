// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;

use courier_domain::{AttemptOutcome, DeliveryAttempt, ParcelId, RiderId};

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::delivery_attempts;
use crate::error::PersistenceError;

/// Records one delivery attempt.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_attempt(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
    rider_id: Option<RiderId>,
    outcome: AttemptOutcome,
    note: Option<String>,
    attempted_at: OffsetDateTime,
) -> Result<DeliveryAttempt, PersistenceError> {
    diesel::insert_into(delivery_attempts::table)
        .values((
            delivery_attempts::parcel_id.eq(parcel_id.value()),
            delivery_attempts::rider_id.eq(rider_id.map(|id| id.value())),
            delivery_attempts::outcome.eq(outcome.as_str()),
            delivery_attempts::note.eq(&note),
            delivery_attempts::attempted_at.eq(format_timestamp(attempted_at)?),
        ))
        .execute(conn)?;

    let attempt_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        attempt_id,
        parcel_id = parcel_id.value(),
        outcome = outcome.as_str(),
        "Delivery attempt recorded"
    );

    Ok(DeliveryAttempt {
        attempt_id,
        parcel_id,
        rider_id,
        outcome,
        note,
        attempted_at,
    })
}
