// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The lifecycle orchestrator.
//!
//! Each use case loads the parcel, asks the core what should change, and
//! writes the result in one parcel transaction. Notifications are composed
//! inside the transaction but only sent once it has committed.

use courier::{
    AssignmentDraft, Clock, CodeSource, CoreError, IntakeResult, IssuedChallenge, LifecycleConfig,
    OtpCode, TransitionRequest, TransitionResult, VerifyDecision, apply_delivery_failure,
    apply_transition, evaluate_challenge, issue_challenge, plan_assignment, receive_parcel,
};
use courier_audit::{Actor, TrackingEvent};
use courier_domain::{
    Assignment, AttemptOutcome, DeliveryAttempt, NewParcel, OtpChallenge, Parcel, ParcelId,
    ParcelStatus, Rider, RiderId, Staff, StaffId, TrackingCode, TransitionRoute, validate_name,
    validate_phone,
};
use courier_persistence::{Persistence, PersistenceError, PurgeCounts};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::LifecycleError;
use crate::notify::{self, Notifier, Outgoing};
use crate::request_response::{
    DeliveryInfo, DispatchOutcome, PublicTracking, PublicTrackingEntry, PurgeOutcome,
    RegisterRiderRequest, RegisterStaffRequest, RiderContact, VerifyOutcome,
};

/// How many tracking codes intake tries before giving up.
const MAX_TRACKING_CODE_ATTEMPTS: usize = 5;

const DISPATCH_NOTE: &str = "Dispatched from origin";
const CODE_CONFIRMED_NOTE: &str = "Delivery code confirmed";
const DELIVERED_NOTE: &str = "Delivered to receiver";

enum DispatchCommit {
    AlreadyDispatched(Parcel),
    Dispatched(Parcel, OtpCode),
}

type Assigned = (Parcel, Rider, Assignment, OtpCode);

enum VerifyCommit {
    Verified(Parcel),
    Rotated(Parcel, OtpCode),
}

/// Runs lifecycle use cases against a store.
///
/// Generic over the notifier, clock and code source so tests can observe
/// messages and control time and codes.
pub struct LifecycleService<N, C, S>
where
    N: Notifier,
    C: Clock,
    S: CodeSource,
{
    persistence: Persistence,
    notifier: N,
    clock: C,
    codes: S,
    config: LifecycleConfig,
}

impl<N, C, S> LifecycleService<N, C, S>
where
    N: Notifier,
    C: Clock,
    S: CodeSource,
{
    /// Creates a service.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidInput` if the configuration is unusable.
    pub fn new(
        persistence: Persistence,
        notifier: N,
        clock: C,
        codes: S,
        config: LifecycleConfig,
    ) -> Result<Self, LifecycleError> {
        config.validate()?;
        Ok(Self {
            persistence,
            notifier,
            clock,
            codes,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn persistence_mut(&mut self) -> &mut Persistence {
        &mut self.persistence
    }

    // ========================================================================
    // Intake and dispatch
    // ========================================================================

    /// Receives a parcel at the facility under a freshly generated tracking code.
    ///
    /// # Errors
    ///
    /// Returns an error if the staff member is unknown or inactive, the
    /// parcel data is invalid, or no unused tracking code could be found.
    pub fn create_parcel(
        &mut self,
        staff_id: StaffId,
        new_parcel: &NewParcel,
    ) -> Result<Parcel, LifecycleError> {
        let staff: Staff = self.persistence.get_staff(staff_id)?;
        ensure_active_staff(&staff)?;
        let now: OffsetDateTime = self.clock.now();

        for attempt in 1..=MAX_TRACKING_CODE_ATTEMPTS {
            let tracking_code: TrackingCode = self.codes.next_tracking_code();
            if self.persistence.tracking_code_exists(&tracking_code)? {
                debug!(attempt, "Generated tracking code already in use");
                continue;
            }

            let intake: IntakeResult = receive_parcel(
                new_parcel.clone(),
                tracking_code,
                staff_id,
                &self.config.default_location,
                now,
            )?;

            match self.persistence.insert_parcel(&intake) {
                Ok((parcel, _event)) => {
                    info!(
                        parcel_id = parcel.parcel_id.value(),
                        tracking_code = parcel.tracking_code.as_str(),
                        staff_id = staff_id.value(),
                        "Parcel received"
                    );
                    self.send(&parcel, "intake", notify::intake_messages(&parcel));
                    return Ok(parcel);
                }
                Err(PersistenceError::Duplicate(_)) => {
                    debug!(attempt, "Tracking code taken between check and insert");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(LifecycleError::Internal(format!(
            "no unused tracking code after {MAX_TRACKING_CODE_ATTEMPTS} attempts"
        )))
    }

    /// Dispatches a parcel and sends the receiver a delivery code.
    ///
    /// A parcel that was already dispatched is left untouched and reported
    /// as such.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the parcel is in `PROCESSING`, or
    /// `NotFound` if the parcel or staff member does not exist.
    pub fn dispatch(
        &mut self,
        parcel_id: ParcelId,
        staff_id: StaffId,
    ) -> Result<DispatchOutcome, LifecycleError> {
        let now: OffsetDateTime = self.clock.now();
        let config: &LifecycleConfig = &self.config;
        let codes: &S = &self.codes;

        let commit: DispatchCommit = self.persistence.write_parcel(
            parcel_id,
            |uow| -> Result<DispatchCommit, LifecycleError> {
                let staff: Staff = uow.load_staff(staff_id)?;
                ensure_active_staff(&staff)?;
                let parcel: Parcel = uow.load_parcel()?;
                if parcel.dispatched {
                    return Ok(DispatchCommit::AlreadyDispatched(parcel));
                }

                let request: TransitionRequest = TransitionRequest::standard(
                    ParcelStatus::InTransit,
                    &config.default_location,
                    Actor::Staff(staff_id),
                )
                .with_note(Some(String::from(DISPATCH_NOTE)));
                let result: TransitionResult = apply_transition(&parcel, request, now)?;

                let issued: IssuedChallenge = issue_challenge(config, codes, now)?;
                uow.replace_challenge(&issued)?;
                let stored: Parcel = uow.store_parcel(result.parcel)?;
                uow.append_tracking_event(result.event)?;
                Ok(DispatchCommit::Dispatched(stored, issued.code))
            },
        )?;

        match commit {
            DispatchCommit::AlreadyDispatched(parcel) => {
                debug!(parcel_id = parcel_id.value(), "Parcel already dispatched");
                Ok(DispatchOutcome {
                    parcel_id,
                    already_dispatched: true,
                    status: parcel.current_status,
                })
            }
            DispatchCommit::Dispatched(parcel, code) => {
                info!(
                    parcel_id = parcel_id.value(),
                    status = %parcel.current_status,
                    "Parcel dispatched"
                );
                self.send(&parcel, "dispatch", notify::dispatch_messages(&parcel, &code));
                Ok(DispatchOutcome {
                    parcel_id,
                    already_dispatched: false,
                    status: parcel.current_status,
                })
            }
        }
    }

    // ========================================================================
    // Delivery
    // ========================================================================

    /// Hands a parcel to a rider and issues a fresh delivery code.
    ///
    /// Reassigning replaces the previous rider and supersedes the previous code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parcel, rider or staff member does not exist,
    /// `RiderInactive` for a deactivated rider, or `InvalidTransition` if the
    /// parcel cannot go out for delivery from its current status.
    pub fn assign_rider(
        &mut self,
        parcel_id: ParcelId,
        rider_id: RiderId,
        staff_id: StaffId,
    ) -> Result<Assignment, LifecycleError> {
        let now: OffsetDateTime = self.clock.now();
        let config: &LifecycleConfig = &self.config;
        let codes: &S = &self.codes;

        let (parcel, rider, assignment, code): Assigned = self.persistence.write_parcel(
            parcel_id,
            |uow| -> Result<Assigned, LifecycleError> {
                let staff: Staff = uow.load_staff(staff_id)?;
                ensure_active_staff(&staff)?;
                let parcel: Parcel = uow.load_parcel()?;
                let rider: Rider = uow.load_rider(rider_id)?;

                let existing: Option<Assignment> = uow.find_assignment()?;
                let draft: AssignmentDraft =
                    plan_assignment(parcel_id, existing.as_ref(), &rider, staff_id, now)?;

                let request: TransitionRequest = TransitionRequest::standard(
                    ParcelStatus::OutForDelivery,
                    &config.default_location,
                    Actor::Staff(staff_id),
                )
                .with_route(TransitionRoute::Handoff)
                .with_note(Some(format!("Assigned to rider {}", rider.full_name)))
                .with_rider(Some(rider.rider_id));
                let result: TransitionResult = apply_transition(&parcel, request, now)?;

                let assignment: Assignment = uow.save_assignment(draft)?;
                let issued: IssuedChallenge = issue_challenge(config, codes, now)?;
                uow.replace_challenge(&issued)?;
                let stored: Parcel = uow.store_parcel(result.parcel)?;
                uow.append_tracking_event(result.event)?;
                Ok((stored, rider, assignment, issued.code))
            },
        )?;

        info!(
            parcel_id = parcel_id.value(),
            rider_id = rider_id.value(),
            status = %parcel.current_status,
            "Rider assigned"
        );
        self.send(
            &parcel,
            "assignment",
            notify::assignment_messages(&parcel, &rider, &code),
        );
        Ok(assignment)
    }

    /// Checks a delivery code submitted by the receiver.
    ///
    /// A wrong code burns the open challenge and sends a new one; the
    /// rotation is committed and reported as `verified: false`.
    ///
    /// The code is checked against the challenge open at the time of the
    /// call, and only that challenge is consumed. If a concurrent request
    /// consumed it first, nothing is rotated and `Conflict` is returned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for parcels in a terminal status,
    /// `NoActiveChallenge` if no code is open, `Expired` if it lapsed, or
    /// `Conflict` if another request consumed the code first.
    pub fn verify_otp(
        &mut self,
        parcel_id: ParcelId,
        submitted: &str,
    ) -> Result<VerifyOutcome, LifecycleError> {
        let now: OffsetDateTime = self.clock.now();
        let parcel: Parcel = self.persistence.get_parcel(parcel_id)?;
        ensure_not_terminal(&parcel)?;

        // bcrypt runs outside the write lock
        let open: Option<OtpChallenge> = self.persistence.get_open_challenge(parcel_id)?;
        let decision: VerifyDecision =
            evaluate_challenge(open.as_ref(), submitted, &self.config, now)?;

        let config: &LifecycleConfig = &self.config;
        let codes: &S = &self.codes;
        let commit: VerifyCommit = match decision {
            VerifyDecision::NoActiveChallenge => return Err(LifecycleError::NoActiveChallenge),
            VerifyDecision::Expired { .. } => return Err(LifecycleError::Expired),
            VerifyDecision::Verified { challenge_id } => self.persistence.write_parcel(
                parcel_id,
                |uow| -> Result<VerifyCommit, LifecycleError> {
                    let parcel: Parcel = uow.load_parcel()?;
                    ensure_not_terminal(&parcel)?;
                    uow.consume_challenge(challenge_id, now)?;
                    if parcel.current_status == ParcelStatus::OutForDelivery {
                        return Ok(VerifyCommit::Verified(parcel));
                    }
                    let request: TransitionRequest = TransitionRequest::standard(
                        ParcelStatus::OutForDelivery,
                        &config.default_location,
                        Actor::System,
                    )
                    .with_route(TransitionRoute::Handoff)
                    .with_note(Some(String::from(CODE_CONFIRMED_NOTE)));
                    let result: TransitionResult = apply_transition(&parcel, request, now)?;
                    let stored: Parcel = uow.store_parcel(result.parcel)?;
                    uow.append_tracking_event(result.event)?;
                    Ok(VerifyCommit::Verified(stored))
                },
            )?,
            VerifyDecision::Mismatch { challenge_id } => self.persistence.write_parcel(
                parcel_id,
                |uow| -> Result<VerifyCommit, LifecycleError> {
                    let parcel: Parcel = uow.load_parcel()?;
                    ensure_not_terminal(&parcel)?;
                    uow.consume_challenge(challenge_id, now)?;
                    let issued: IssuedChallenge = issue_challenge(config, codes, now)?;
                    uow.replace_challenge(&issued)?;
                    Ok(VerifyCommit::Rotated(parcel, issued.code))
                },
            )?,
        };

        match commit {
            VerifyCommit::Verified(parcel) => {
                info!(
                    parcel_id = parcel_id.value(),
                    status = %parcel.current_status,
                    "Delivery code verified"
                );
                Ok(VerifyOutcome {
                    verified: true,
                    rotated: false,
                })
            }
            VerifyCommit::Rotated(parcel, code) => {
                info!(parcel_id = parcel_id.value(), "Delivery code rejected and rotated");
                self.send(&parcel, "otp_rotation", notify::rotation_messages(&parcel, &code));
                Ok(VerifyOutcome {
                    verified: false,
                    rotated: true,
                })
            }
        }
    }

    /// Records a delivery attempt. The parcel's status is not changed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parcel or the named rider does not exist.
    pub fn record_attempt(
        &mut self,
        parcel_id: ParcelId,
        rider_id: Option<RiderId>,
        outcome: AttemptOutcome,
        note: Option<String>,
    ) -> Result<DeliveryAttempt, LifecycleError> {
        let now: OffsetDateTime = self.clock.now();
        let note: Option<String> = non_blank(note);

        let attempt: DeliveryAttempt =
            self.persistence
                .write_parcel(parcel_id, |uow| -> Result<DeliveryAttempt, LifecycleError> {
                    uow.load_parcel()?;
                    if let Some(rider_id) = rider_id {
                        uow.load_rider(rider_id)?;
                    }
                    Ok(uow.record_attempt(rider_id, outcome, note, now)?)
                })?;

        info!(
            parcel_id = parcel_id.value(),
            attempt_id = attempt.attempt_id,
            outcome = %attempt.outcome,
            "Delivery attempt recorded"
        );
        Ok(attempt)
    }

    /// Marks a parcel delivered.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the parcel is out for delivery or
    /// has a recorded attempt.
    pub fn confirm_delivery(
        &mut self,
        parcel_id: ParcelId,
        staff_id: StaffId,
    ) -> Result<Parcel, LifecycleError> {
        let request: TransitionRequest = TransitionRequest::standard(
            ParcelStatus::Delivered,
            &self.config.default_location,
            Actor::Staff(staff_id),
        )
        .with_note(Some(String::from(DELIVERED_NOTE)));
        let (parcel, _event) = self.commit_transition(parcel_id, staff_id, |parcel, now| {
            apply_transition(parcel, request, now)
        })?;

        info!(parcel_id = parcel_id.value(), "Parcel delivered");
        self.send(&parcel, "delivered", notify::delivered_messages(&parcel));
        Ok(parcel)
    }

    /// Records a failed delivery and sends the parcel back out.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank reason, or `InvalidTransition`
    /// unless the parcel is out for delivery or has a recorded attempt.
    pub fn mark_failed(
        &mut self,
        parcel_id: ParcelId,
        reason: &str,
        staff_id: StaffId,
    ) -> Result<Parcel, LifecycleError> {
        let location: String = self.config.default_location.clone();
        let (parcel, _event) = self.commit_transition(parcel_id, staff_id, |parcel, now| {
            apply_delivery_failure(parcel, reason, &location, Actor::Staff(staff_id), now)
        })?;

        info!(
            parcel_id = parcel_id.value(),
            status = %parcel.current_status,
            "Delivery marked failed"
        );
        Ok(parcel)
    }

    /// Moves a parcel along the standard transition table.
    ///
    /// Uses the configured default location when `location` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the edge is not on the table, or
    /// `InvalidInput` for a blank location.
    pub fn transition(
        &mut self,
        parcel_id: ParcelId,
        to: ParcelStatus,
        location: Option<&str>,
        note: Option<String>,
        staff_id: StaffId,
    ) -> Result<TrackingEvent, LifecycleError> {
        let location: &str = location.unwrap_or(&self.config.default_location);
        let request: TransitionRequest =
            TransitionRequest::standard(to, location, Actor::Staff(staff_id))
                .with_note(non_blank(note));
        let (parcel, event) = self.commit_transition(parcel_id, staff_id, |parcel, now| {
            apply_transition(parcel, request, now)
        })?;

        info!(
            parcel_id = parcel_id.value(),
            status = %parcel.current_status,
            event_id = event.event_id,
            "Parcel status updated"
        );
        self.send(
            &parcel,
            "status_update",
            notify::status_update_messages(&parcel),
        );
        Ok(event)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// # Errors
    ///
    /// Returns `NotFound` if the parcel does not exist.
    pub fn get_parcel(&mut self, parcel_id: ParcelId) -> Result<Parcel, LifecycleError> {
        Ok(self.persistence.get_parcel(parcel_id)?)
    }

    /// Public timeline for a tracking code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed code or `NotFound` if no
    /// parcel carries it.
    pub fn track(&mut self, tracking_code: &str) -> Result<PublicTracking, LifecycleError> {
        let code: TrackingCode = TrackingCode::parse(tracking_code)?;
        let parcel: Parcel = self.persistence.get_parcel_by_tracking_code(&code)?;
        let history: Vec<TrackingEvent> =
            self.persistence.get_tracking_history(parcel.parcel_id)?;

        Ok(PublicTracking {
            tracking_code: parcel.tracking_code,
            status: parcel.current_status,
            history: history.into_iter().map(PublicTrackingEntry::from).collect(),
        })
    }

    /// Full tracking history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parcel does not exist.
    pub fn tracking_history(
        &mut self,
        parcel_id: ParcelId,
    ) -> Result<Vec<TrackingEvent>, LifecycleError> {
        self.persistence.get_parcel(parcel_id)?;
        Ok(self.persistence.get_tracking_history(parcel_id)?)
    }

    /// Delivery status, current rider and code state for staff.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parcel does not exist.
    pub fn delivery_info(&mut self, parcel_id: ParcelId) -> Result<DeliveryInfo, LifecycleError> {
        let now: OffsetDateTime = self.clock.now();
        let parcel: Parcel = self.persistence.get_parcel(parcel_id)?;
        let assignment: Option<Assignment> = self.persistence.get_assignment(parcel_id)?;
        let rider: Option<RiderContact> = match &assignment {
            Some(a) => Some(RiderContact::from(self.persistence.get_rider(a.rider_id)?)),
            None => None,
        };
        let open: Option<OtpChallenge> = self
            .persistence
            .get_open_challenge(parcel_id)?
            .filter(|c| !c.is_expired_at(now));

        Ok(DeliveryInfo {
            parcel_id,
            tracking_code: parcel.tracking_code,
            status: parcel.current_status,
            dispatched: parcel.dispatched,
            dispatched_at: parcel.dispatched_at,
            delivered: parcel.delivered,
            delivered_at: parcel.delivered_at,
            delivery_outcome: parcel.delivery_outcome,
            failure_reason: parcel.failure_reason,
            rider,
            assigned_at: assignment.map(|a| a.assigned_at),
            has_active_otp: open.is_some(),
            otp_expires_at: open.map(|c| c.expires_at),
        })
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the parcel does not exist.
    pub fn list_attempts(
        &mut self,
        parcel_id: ParcelId,
    ) -> Result<Vec<DeliveryAttempt>, LifecycleError> {
        self.persistence.get_parcel(parcel_id)?;
        Ok(self.persistence.list_attempts(parcel_id)?)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_riders(&mut self, active_only: bool) -> Result<Vec<Rider>, LifecycleError> {
        Ok(self.persistence.list_riders(active_only)?)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the staff member does not exist.
    pub fn get_staff(&mut self, staff_id: StaffId) -> Result<Staff, LifecycleError> {
        Ok(self.persistence.get_staff(staff_id)?)
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad name or phone, or if the phone
    /// number is already registered.
    pub fn register_staff(&mut self, request: &RegisterStaffRequest) -> Result<Staff, LifecycleError> {
        validate_name(&request.full_name)?;
        validate_phone(&request.phone)?;
        let now: OffsetDateTime = self.clock.now();
        let staff: Staff = self.persistence.create_staff(
            request.full_name.trim(),
            request.phone.trim(),
            request.role,
            now,
        )?;
        info!(staff_id = staff.staff_id.value(), role = %staff.role, "Staff registered");
        Ok(staff)
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad name or phone, or if the phone
    /// number is already registered.
    pub fn register_rider(&mut self, request: &RegisterRiderRequest) -> Result<Rider, LifecycleError> {
        validate_name(&request.full_name)?;
        validate_phone(&request.phone)?;
        let now: OffsetDateTime = self.clock.now();
        let vehicle: Option<String> = non_blank(request.vehicle_details.clone());
        let rider: Rider = self.persistence.create_rider(
            request.full_name.trim(),
            request.phone.trim(),
            vehicle.as_deref(),
            now,
        )?;
        info!(rider_id = rider.rider_id.value(), "Rider registered");
        Ok(rider)
    }

    /// Deactivates a rider. Existing assignments are kept.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the rider does not exist.
    pub fn deactivate_rider(&mut self, rider_id: RiderId) -> Result<Rider, LifecycleError> {
        let rider: Rider = self.persistence.set_rider_active(rider_id, false)?;
        info!(rider_id = rider_id.value(), "Rider deactivated");
        Ok(rider)
    }

    /// Deletes a delivered, returned or cancelled parcel and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the parcel is still in flight, or
    /// `NotFound` if it does not exist.
    pub fn purge_parcel(&mut self, parcel_id: ParcelId) -> Result<PurgeOutcome, LifecycleError> {
        let counts: PurgeCounts =
            self.persistence
                .write_parcel(parcel_id, |uow| -> Result<PurgeCounts, LifecycleError> {
                    let parcel: Parcel = uow.load_parcel()?;
                    if !parcel.current_status.is_terminal() {
                        return Err(LifecycleError::invalid_input(
                            "parcel_id",
                            format!(
                                "parcel {parcel_id} is {} and cannot be purged",
                                parcel.current_status
                            ),
                        ));
                    }
                    Ok(uow.purge()?)
                })?;

        info!(
            parcel_id = parcel_id.value(),
            events = counts.events,
            challenges = counts.challenges,
            "Parcel purged"
        );
        Ok(PurgeOutcome {
            parcel_id,
            events: counts.events,
            challenges: counts.challenges,
            assignments: counts.assignments,
            attempts: counts.attempts,
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Runs a staff-initiated transition in one parcel transaction.
    fn commit_transition<F>(
        &mut self,
        parcel_id: ParcelId,
        staff_id: StaffId,
        decide: F,
    ) -> Result<(Parcel, TrackingEvent), LifecycleError>
    where
        F: FnOnce(&Parcel, OffsetDateTime) -> Result<TransitionResult, CoreError>,
    {
        let now: OffsetDateTime = self.clock.now();
        self.persistence.write_parcel(parcel_id, |uow| -> Result<_, LifecycleError> {
            let staff: Staff = uow.load_staff(staff_id)?;
            ensure_active_staff(&staff)?;
            let parcel: Parcel = uow.load_parcel()?;
            let result: TransitionResult = decide(&parcel, now)?;
            let stored: Parcel = uow.store_parcel(result.parcel)?;
            let event: TrackingEvent = uow.append_tracking_event(result.event)?;
            Ok((stored, event))
        })
    }

    fn send(&self, parcel: &Parcel, purpose: &str, outgoing: Vec<Outgoing>) {
        notify::deliver(&self.notifier, parcel, purpose, outgoing);
    }
}

fn ensure_active_staff(staff: &Staff) -> Result<(), LifecycleError> {
    if staff.is_active {
        Ok(())
    } else {
        Err(LifecycleError::invalid_input(
            "staff_id",
            format!("staff member {} is inactive", staff.staff_id),
        ))
    }
}

/// Delivery codes mean nothing once a parcel is delivered, returned or cancelled.
fn ensure_not_terminal(parcel: &Parcel) -> Result<(), LifecycleError> {
    if parcel.current_status.is_terminal() {
        Err(LifecycleError::InvalidTransition {
            from: parcel.current_status,
            to: ParcelStatus::OutForDelivery,
        })
    } else {
        Ok(())
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
