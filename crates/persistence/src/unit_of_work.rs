// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The per-parcel write transaction.

use diesel::SqliteConnection;
use time::OffsetDateTime;

use courier::{AssignmentDraft, IssuedChallenge};
use courier_audit::{NewTrackingEvent, TrackingEvent};
use courier_domain::{
    Assignment, AttemptOutcome, DeliveryAttempt, OtpChallenge, Parcel, ParcelId, Rider, RiderId,
    Staff, StaffId,
};

use crate::error::PersistenceError;
use crate::mutations::purge::PurgeCounts;
use crate::{mutations, queries};

/// Reads and writes of one parcel inside one `IMMEDIATE` transaction.
///
/// Obtained from [`crate::Persistence::write_parcel`]. Everything done
/// through it commits together or not at all.
pub struct ParcelUnitOfWork<'a> {
    conn: &'a mut SqliteConnection,
    parcel_id: ParcelId,
}

impl<'a> ParcelUnitOfWork<'a> {
    pub(crate) const fn new(conn: &'a mut SqliteConnection, parcel_id: ParcelId) -> Self {
        Self { conn, parcel_id }
    }

    #[must_use]
    pub const fn parcel_id(&self) -> ParcelId {
        self.parcel_id
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the parcel does not exist.
    pub fn load_parcel(&mut self) -> Result<Parcel, PersistenceError> {
        queries::parcels::get_parcel(self.conn, self.parcel_id)
    }

    /// Writes the parcel with a version check and returns it at its new version.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the parcel changed since it was loaded.
    pub fn store_parcel(&mut self, parcel: Parcel) -> Result<Parcel, PersistenceError> {
        self.ensure_own(parcel.parcel_id)?;
        let version: i64 = mutations::parcels::update_parcel_versioned(self.conn, &parcel)?;
        Ok(Parcel { version, ..parcel })
    }

    /// # Errors
    ///
    /// Returns an error if the event belongs to another parcel or the insert fails.
    pub fn append_tracking_event(
        &mut self,
        event: NewTrackingEvent,
    ) -> Result<TrackingEvent, PersistenceError> {
        self.ensure_own(event.parcel_id)?;
        mutations::tracking::insert_tracking_event(self.conn, event)
    }

    /// Supersedes any open challenge and stores `issued` as the only open one.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails.
    pub fn replace_challenge(
        &mut self,
        issued: &IssuedChallenge,
    ) -> Result<OtpChallenge, PersistenceError> {
        mutations::challenges::supersede_open_challenges(
            self.conn,
            self.parcel_id,
            issued.created_at,
        )?;
        mutations::challenges::insert_challenge(self.conn, self.parcel_id, issued)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the challenge was already consumed.
    pub fn consume_challenge(
        &mut self,
        challenge_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::challenges::consume_challenge(self.conn, challenge_id, now)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_assignment(&mut self) -> Result<Option<Assignment>, PersistenceError> {
        queries::assignments::find_assignment(self.conn, self.parcel_id)
    }

    /// # Errors
    ///
    /// Returns an error if the draft is for another parcel or the write fails.
    pub fn save_assignment(
        &mut self,
        draft: AssignmentDraft,
    ) -> Result<Assignment, PersistenceError> {
        self.ensure_own(draft.parcel_id)?;
        mutations::assignments::save_assignment(self.conn, draft)
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_attempt(
        &mut self,
        rider_id: Option<RiderId>,
        outcome: AttemptOutcome,
        note: Option<String>,
        attempted_at: OffsetDateTime,
    ) -> Result<DeliveryAttempt, PersistenceError> {
        mutations::attempts::insert_attempt(
            self.conn,
            self.parcel_id,
            rider_id,
            outcome,
            note,
            attempted_at,
        )
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the rider does not exist.
    pub fn load_rider(&mut self, rider_id: RiderId) -> Result<Rider, PersistenceError> {
        queries::registry::get_rider(self.conn, rider_id)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the staff member does not exist.
    pub fn load_staff(&mut self, staff_id: StaffId) -> Result<Staff, PersistenceError> {
        queries::registry::get_staff(self.conn, staff_id)
    }

    /// Deletes the parcel and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns an error if any delete fails.
    pub fn purge(&mut self) -> Result<PurgeCounts, PersistenceError> {
        mutations::purge::purge_parcel(self.conn, self.parcel_id)
    }

    fn ensure_own(&self, parcel_id: ParcelId) -> Result<(), PersistenceError> {
        if parcel_id == self.parcel_id {
            Ok(())
        } else {
            Err(PersistenceError::QueryFailed(format!(
                "unit of work for parcel {} cannot write parcel {parcel_id}",
                self.parcel_id
            )))
        }
    }
}
