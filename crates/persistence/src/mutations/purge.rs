// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use courier_domain::ParcelId;

use crate::diesel_schema::{
    assignments, delivery_attempts, otp_challenges, parcels, tracking_events,
};
use crate::error::PersistenceError;

/// Row counts removed by a purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeCounts {
    pub attempts: usize,
    pub assignments: usize,
    pub challenges: usize,
    pub events: usize,
}

/// Deletes a parcel and every row it owns.
///
/// Children go first; the schema has no cascading deletes.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the parcel row was already gone.
pub fn purge_parcel(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
) -> Result<PurgeCounts, PersistenceError> {
    let id: i64 = parcel_id.value();

    let counts: PurgeCounts = PurgeCounts {
        attempts: diesel::delete(delivery_attempts::table.filter(delivery_attempts::parcel_id.eq(id)))
            .execute(conn)?,
        assignments: diesel::delete(assignments::table.filter(assignments::parcel_id.eq(id)))
            .execute(conn)?,
        challenges: diesel::delete(otp_challenges::table.filter(otp_challenges::parcel_id.eq(id)))
            .execute(conn)?,
        events: diesel::delete(tracking_events::table.filter(tracking_events::parcel_id.eq(id)))
            .execute(conn)?,
    };

    let removed: usize = diesel::delete(parcels::table.filter(parcels::parcel_id.eq(id)))
        .execute(conn)?;
    if removed == 0 {
        return Err(PersistenceError::NotFound(format!("parcel {parcel_id}")));
    }

    info!(
        parcel_id = id,
        attempts = counts.attempts,
        assignments = counts.assignments,
        challenges = counts.challenges,
        events = counts.events,
        "Parcel purged"
    );
    Ok(counts)
}
