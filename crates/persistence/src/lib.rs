// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the courier parcel lifecycle engine.
//!
//! Built on Diesel over `SQLite`. Schema changes ship as embedded
//! migrations and are applied when a database is opened.
//!
//! ## Write model
//!
//! Every change to a parcel goes through [`Persistence::write_parcel`],
//! which opens an `IMMEDIATE` transaction (one writer at a time) and hands
//! the caller a [`ParcelUnitOfWork`]. The parcel row carries a `version`
//! that is checked and bumped on every write, so a stale read can never
//! overwrite a newer one.
//!
//! ## Ownership
//!
//! Tracking events, challenges, assignments and attempts belong to their
//! parcel. Foreign keys are enforced but never cascade; removing a parcel
//! goes through [`Persistence::purge_parcel`], which deletes children
//! explicitly.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives every caller its own shared
//! in-memory database.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tracing::debug;

use courier::IntakeResult;
use courier_audit::{NewTrackingEvent, TrackingEvent};
use courier_domain::{
    Assignment, DeliveryAttempt, OtpChallenge, Parcel, ParcelId, Rider, RiderId, Staff, StaffId,
    StaffRole, TrackingCode,
};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod unit_of_work;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::purge::PurgeCounts;
pub use unit_of_work::ParcelUnitOfWork;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Failure inside a write transaction: either the store or the caller's work.
enum TransactionError<E> {
    Store(PersistenceError),
    Work(E),
}

impl<E> From<diesel::result::Error> for TransactionError<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Store(PersistenceError::from(err))
    }
}

impl<E> From<PersistenceError> for TransactionError<E> {
    fn from(err: PersistenceError) -> Self {
        Self::Store(err)
    }
}

/// Persistence adapter over one `SQLite` connection.
///
/// Open several adapters on the same file to get several writers; they
/// serialize on the database lock.
pub struct Persistence {
    conn: SqliteConnection,
    database_url: String,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_courier_{db_id}?mode=memory&cache=shared");
        Self::open(shared_memory_url, false)
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;
        Self::open(path_str.to_string(), true)
    }

    /// Opens another connection to the same database.
    ///
    /// For in-memory databases the copy shares data with `self` for as long
    /// as either is alive.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened.
    pub fn reopen(&self) -> Result<Self, PersistenceError> {
        let is_file = !self.database_url.starts_with("file:memdb_");
        Self::open(self.database_url.clone(), is_file)
    }

    fn open(database_url: String, is_file: bool) -> Result<Self, PersistenceError> {
        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&database_url)?;
        if is_file {
            backend::sqlite::enable_wal_mode(&mut conn)?;
        }
        conn.verify_foreign_key_enforcement()?;
        Ok(Self { conn, database_url })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Runs `work` against one parcel inside an `IMMEDIATE` transaction.
    ///
    /// The transaction commits if `work` returns `Ok` and rolls back
    /// otherwise. Store failures reach the caller through `E::from`.
    ///
    /// # Errors
    ///
    /// Returns whatever `work` returns, or a converted `PersistenceError`
    /// if the transaction itself cannot begin or commit.
    pub fn write_parcel<T, E, F>(&mut self, parcel_id: ParcelId, work: F) -> Result<T, E>
    where
        E: From<PersistenceError>,
        F: FnOnce(&mut ParcelUnitOfWork<'_>) -> Result<T, E>,
    {
        let outcome: Result<T, TransactionError<E>> = self.conn.immediate_transaction(|conn| {
            let mut uow: ParcelUnitOfWork<'_> = ParcelUnitOfWork::new(conn, parcel_id);
            work(&mut uow).map_err(TransactionError::Work)
        });

        match outcome {
            Ok(value) => Ok(value),
            Err(TransactionError::Store(err)) => {
                debug!(parcel_id = parcel_id.value(), error = %err, "Parcel write rolled back");
                Err(E::from(err))
            }
            Err(TransactionError::Work(err)) => {
                debug!(parcel_id = parcel_id.value(), "Parcel write rolled back");
                Err(err)
            }
        }
    }

    /// Inserts a newly received parcel and its first tracking event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Duplicate` if the tracking code is taken,
    /// or another error if either insert fails. Nothing is written on error.
    pub fn insert_parcel(
        &mut self,
        intake: &IntakeResult,
    ) -> Result<(Parcel, TrackingEvent), PersistenceError> {
        let inserted: Result<(Parcel, TrackingEvent), TransactionError<PersistenceError>> =
            self.conn.immediate_transaction(|conn| {
                let parcel_id: ParcelId = mutations::parcels::insert_parcel(conn, &intake.parcel)?;
                let event: NewTrackingEvent = NewTrackingEvent {
                    parcel_id,
                    ..intake.event.clone()
                };
                let event: TrackingEvent = mutations::tracking::insert_tracking_event(conn, event)?;
                let parcel: Parcel = queries::parcels::get_parcel(conn, parcel_id)?;
                Ok((parcel, event))
            });

        inserted.map_err(|err| match err {
            TransactionError::Store(e) | TransactionError::Work(e) => e,
        })
    }

    /// Deletes a parcel and everything it owns in one transaction.
    ///
    /// Does not look at the parcel's status; callers decide what may be purged.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the parcel does not exist.
    pub fn purge_parcel(&mut self, parcel_id: ParcelId) -> Result<PurgeCounts, PersistenceError> {
        self.write_parcel(parcel_id, |uow| uow.purge())
    }

    /// Registers a staff member.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Duplicate` if the phone number is taken.
    pub fn create_staff(
        &mut self,
        full_name: &str,
        phone: &str,
        role: StaffRole,
        now: OffsetDateTime,
    ) -> Result<Staff, PersistenceError> {
        let staff_id: StaffId =
            mutations::registry::create_staff(&mut self.conn, full_name, phone, role, now)?;
        queries::registry::get_staff(&mut self.conn, staff_id)
    }

    /// Registers an active rider.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Duplicate` if the phone number is taken.
    pub fn create_rider(
        &mut self,
        full_name: &str,
        phone: &str,
        vehicle_details: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Rider, PersistenceError> {
        let rider_id: RiderId = mutations::registry::create_rider(
            &mut self.conn,
            full_name,
            phone,
            vehicle_details,
            now,
        )?;
        queries::registry::get_rider(&mut self.conn, rider_id)
    }

    /// Activates or deactivates a rider and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the rider does not exist.
    pub fn set_rider_active(
        &mut self,
        rider_id: RiderId,
        active: bool,
    ) -> Result<Rider, PersistenceError> {
        mutations::registry::set_rider_active(&mut self.conn, rider_id, active)?;
        queries::registry::get_rider(&mut self.conn, rider_id)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the parcel does not exist.
    pub fn get_parcel(&mut self, parcel_id: ParcelId) -> Result<Parcel, PersistenceError> {
        queries::parcels::get_parcel(&mut self.conn, parcel_id)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no parcel has the code.
    pub fn get_parcel_by_tracking_code(
        &mut self,
        tracking_code: &TrackingCode,
    ) -> Result<Parcel, PersistenceError> {
        queries::parcels::get_parcel_by_tracking_code(&mut self.conn, tracking_code)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn tracking_code_exists(
        &mut self,
        tracking_code: &TrackingCode,
    ) -> Result<bool, PersistenceError> {
        queries::parcels::tracking_code_exists(&mut self.conn, tracking_code)
    }

    /// Returns the parcel's tracking history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_tracking_history(
        &mut self,
        parcel_id: ParcelId,
    ) -> Result<Vec<TrackingEvent>, PersistenceError> {
        queries::tracking::list_tracking_events(&mut self.conn, parcel_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_assignment(
        &mut self,
        parcel_id: ParcelId,
    ) -> Result<Option<Assignment>, PersistenceError> {
        queries::assignments::find_assignment(&mut self.conn, parcel_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_open_challenge(
        &mut self,
        parcel_id: ParcelId,
    ) -> Result<Option<OtpChallenge>, PersistenceError> {
        queries::challenges::latest_open_challenge(&mut self.conn, parcel_id)
    }

    /// Returns every challenge issued for the parcel, consumed or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_challenges(
        &mut self,
        parcel_id: ParcelId,
    ) -> Result<Vec<OtpChallenge>, PersistenceError> {
        queries::challenges::list_challenges(&mut self.conn, parcel_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_attempts(
        &mut self,
        parcel_id: ParcelId,
    ) -> Result<Vec<DeliveryAttempt>, PersistenceError> {
        queries::attempts::list_attempts(&mut self.conn, parcel_id)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the rider does not exist.
    pub fn get_rider(&mut self, rider_id: RiderId) -> Result<Rider, PersistenceError> {
        queries::registry::get_rider(&mut self.conn, rider_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_riders(&mut self, active_only: bool) -> Result<Vec<Rider>, PersistenceError> {
        queries::registry::list_riders(&mut self.conn, active_only)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the staff member does not exist.
    pub fn get_staff(&mut self, staff_id: StaffId) -> Result<Staff, PersistenceError> {
        queries::registry::get_staff(&mut self.conn, staff_id)
    }

    /// Returns `true` if at least one staff member has been registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_staff(&mut self) -> Result<bool, PersistenceError> {
        Ok(queries::registry::count_staff(&mut self.conn)? > 0)
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("database_url", &self.database_url)
            .finish_non_exhaustive()
    }
}
