// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use courier_domain::{OtpChallenge, ParcelId};

use crate::data_models::OtpChallengeRow;
use crate::diesel_schema::otp_challenges;
use crate::error::PersistenceError;

/// Retrieves the newest unconsumed challenge of a parcel, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn latest_open_challenge(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
) -> Result<Option<OtpChallenge>, PersistenceError> {
    let row: Option<OtpChallengeRow> = otp_challenges::table
        .filter(otp_challenges::parcel_id.eq(parcel_id.value()))
        .filter(otp_challenges::consumed_at.is_null())
        .order(otp_challenges::challenge_id.desc())
        .select(OtpChallengeRow::as_select())
        .first(conn)
        .optional()?;

    row.map(OtpChallenge::try_from).transpose()
}

/// Retrieves every challenge ever issued for a parcel, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_challenges(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
) -> Result<Vec<OtpChallenge>, PersistenceError> {
    let rows: Vec<OtpChallengeRow> = otp_challenges::table
        .filter(otp_challenges::parcel_id.eq(parcel_id.value()))
        .order(otp_challenges::challenge_id.asc())
        .select(OtpChallengeRow::as_select())
        .load(conn)?;

    rows.into_iter().map(OtpChallenge::try_from).collect()
}
