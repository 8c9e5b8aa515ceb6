// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use courier_audit::TrackingEvent;
use courier_domain::ParcelId;

use crate::data_models::TrackingEventRow;
use crate::diesel_schema::tracking_events;
use crate::error::PersistenceError;

/// Retrieves the full tracking history of a parcel, oldest first.
///
/// Rows are ordered by `event_id`. Event times are clamped to be
/// non-decreasing when written, so id order is also time order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_tracking_events(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
) -> Result<Vec<TrackingEvent>, PersistenceError> {
    let rows: Vec<TrackingEventRow> = tracking_events::table
        .filter(tracking_events::parcel_id.eq(parcel_id.value()))
        .order(tracking_events::event_id.asc())
        .select(TrackingEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TrackingEvent::try_from).collect()
}
