// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use courier::AssignmentDraft;
use courier_domain::Assignment;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::assignments;
use crate::error::PersistenceError;

/// Writes an assignment, updating the existing row when the draft has one.
///
/// # Errors
///
/// Returns an error if the write fails or the row to update has vanished.
pub fn save_assignment(
    conn: &mut SqliteConnection,
    draft: AssignmentDraft,
) -> Result<Assignment, PersistenceError> {
    let assigned_at: String = format_timestamp(draft.assigned_at)?;

    let assignment_id: i64 = if let Some(assignment_id) = draft.assignment_id {
        let updated: usize = diesel::update(assignments::table)
            .filter(assignments::assignment_id.eq(assignment_id))
            .set((
                assignments::rider_id.eq(draft.rider_id.value()),
                assignments::assigned_by.eq(draft.assigned_by.value()),
                assignments::assigned_at.eq(&assigned_at),
            ))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::Conflict(format!(
                "assignment {assignment_id} no longer exists"
            )));
        }
        assignment_id
    } else {
        diesel::insert_into(assignments::table)
            .values((
                assignments::parcel_id.eq(draft.parcel_id.value()),
                assignments::rider_id.eq(draft.rider_id.value()),
                assignments::assigned_by.eq(draft.assigned_by.value()),
                assignments::assigned_at.eq(&assigned_at),
            ))
            .execute(conn)?;
        conn.get_last_insert_rowid()?
    };

    info!(
        assignment_id,
        parcel_id = draft.parcel_id.value(),
        rider_id = draft.rider_id.value(),
        "Rider assigned"
    );
    Ok(draft.into_assignment(assignment_id))
}
