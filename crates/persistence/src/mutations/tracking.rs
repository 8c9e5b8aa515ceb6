// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use courier_audit::{NewTrackingEvent, TrackingEvent};

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::tracking_events;
use crate::error::PersistenceError;

/// Appends an event to a parcel's tracking history.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_tracking_event(
    conn: &mut SqliteConnection,
    event: NewTrackingEvent,
) -> Result<TrackingEvent, PersistenceError> {
    diesel::insert_into(tracking_events::table)
        .values((
            tracking_events::parcel_id.eq(event.parcel_id.value()),
            tracking_events::status.eq(event.status.as_str()),
            tracking_events::location.eq(&event.location),
            tracking_events::note.eq(&event.note),
            tracking_events::actor_kind.eq(event.actor.kind()),
            tracking_events::actor_staff_id.eq(event.actor.staff_id().map(|id| id.value())),
            tracking_events::rider_id.eq(event.rider.map(|id| id.value())),
            tracking_events::created_at.eq(format_timestamp(event.created_at)?),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        event_id,
        parcel_id = event.parcel_id.value(),
        status = event.status.as_str(),
        "Tracking event appended"
    );
    Ok(TrackingEvent::from_new(event_id, event))
}
