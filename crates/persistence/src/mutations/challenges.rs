// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;

use courier::IssuedChallenge;
use courier_domain::{OtpChallenge, ParcelId};

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::otp_challenges;
use crate::error::PersistenceError;

/// Consumes every open challenge of a parcel. Returns how many were open.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn supersede_open_challenges(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let superseded: usize = diesel::update(otp_challenges::table)
        .filter(otp_challenges::parcel_id.eq(parcel_id.value()))
        .filter(otp_challenges::consumed_at.is_null())
        .set(otp_challenges::consumed_at.eq(Some(format_timestamp(now)?)))
        .execute(conn)?;

    if superseded > 0 {
        debug!(parcel_id = parcel_id.value(), superseded, "Open challenges superseded");
    }
    Ok(superseded)
}

/// Stores the hash of a freshly issued challenge.
///
/// Callers must supersede open challenges first; the schema allows only one
/// open challenge per parcel.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_challenge(
    conn: &mut SqliteConnection,
    parcel_id: ParcelId,
    issued: &IssuedChallenge,
) -> Result<OtpChallenge, PersistenceError> {
    diesel::insert_into(otp_challenges::table)
        .values((
            otp_challenges::parcel_id.eq(parcel_id.value()),
            otp_challenges::code_hash.eq(&issued.code_hash),
            otp_challenges::created_at.eq(format_timestamp(issued.created_at)?),
            otp_challenges::expires_at.eq(format_timestamp(issued.expires_at)?),
        ))
        .execute(conn)?;

    let challenge_id: i64 = conn.get_last_insert_rowid()?;
    debug!(challenge_id, parcel_id = parcel_id.value(), "Challenge stored");

    Ok(OtpChallenge {
        challenge_id,
        parcel_id,
        code_hash: issued.code_hash.clone(),
        created_at: issued.created_at,
        expires_at: issued.expires_at,
        consumed_at: None,
    })
}

/// Consumes one challenge, but only if it is still open.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the challenge was already
/// consumed, which means another writer used it first.
pub fn consume_challenge(
    conn: &mut SqliteConnection,
    challenge_id: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let consumed: usize = diesel::update(otp_challenges::table)
        .filter(otp_challenges::challenge_id.eq(challenge_id))
        .filter(otp_challenges::consumed_at.is_null())
        .set(otp_challenges::consumed_at.eq(Some(format_timestamp(now)?)))
        .execute(conn)?;

    if consumed == 0 {
        return Err(PersistenceError::Conflict(format!(
            "challenge {challenge_id} was already consumed"
        )));
    }
    Ok(())
}
