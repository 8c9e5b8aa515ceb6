// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use courier_domain::{Assignment, ParcelId};

use crate::data_models::AssignmentRow;
use crate::diesel_schema::assignments;
use crate::error::PersistenceError;

/// Retrieves the assignment of a parcel, if it has one.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_assignment(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
) -> Result<Option<Assignment>, PersistenceError> {
    let row: Option<AssignmentRow> = assignments::table
        .filter(assignments::parcel_id.eq(parcel_id.value()))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Assignment::try_from).transpose()
}
