// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The status transition engine.
//!
//! Every function here is pure: it takes the current aggregate and returns
//! the next aggregate plus the one tracking event describing the change.
//! The caller writes both in a single transaction.

use crate::error::CoreError;
use courier_audit::{Actor, NewTrackingEvent};
use courier_domain::{
    DeliveryOutcome, NewParcel, Parcel, ParcelId, ParcelStatus, RiderId, StaffId, TrackingCode,
    TransitionRoute, validate_failure_reason, validate_location, validate_new_parcel,
};
use time::OffsetDateTime;

/// Note recorded on the first event of every parcel.
pub const INTAKE_NOTE: &str = "Parcel received at facility";

/// A requested status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub target: ParcelStatus,
    pub route: TransitionRoute,
    pub location: String,
    pub note: Option<String>,
    pub actor: Actor,
    pub rider: Option<RiderId>,
}

impl TransitionRequest {
    /// A request on the standard table with no note or rider.
    #[must_use]
    pub fn standard(target: ParcelStatus, location: &str, actor: Actor) -> Self {
        Self {
            target,
            route: TransitionRoute::Standard,
            location: location.to_string(),
            note: None,
            actor,
            rider: None,
        }
    }

    #[must_use]
    pub fn with_route(mut self, route: TransitionRoute) -> Self {
        self.route = route;
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    #[must_use]
    pub const fn with_rider(mut self, rider: Option<RiderId>) -> Self {
        self.rider = rider;
        self
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The parcel after the transition.
    pub parcel: Parcel,
    /// The tracking event recording this transition.
    pub event: NewTrackingEvent,
}

/// A parcel about to be inserted, with its first event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeResult {
    /// The parcel. Its id is a placeholder until the store assigns one.
    pub parcel: Parcel,
    /// The `RECEIVED` event. Its parcel id is likewise a placeholder.
    pub event: NewTrackingEvent,
}

/// Builds a new parcel in `RECEIVED` together with its intake event.
///
/// # Errors
///
/// Returns an error if the intake data or location fails validation.
pub fn receive_parcel(
    new_parcel: NewParcel,
    tracking_code: TrackingCode,
    received_by: StaffId,
    location: &str,
    now: OffsetDateTime,
) -> Result<IntakeResult, CoreError> {
    validate_new_parcel(&new_parcel)?;
    validate_location(location)?;

    let placeholder: ParcelId = ParcelId::new(0);
    let parcel: Parcel = Parcel {
        parcel_id: placeholder,
        tracking_code,
        sender: new_parcel.sender,
        receiver: new_parcel.receiver,
        parcel_type: new_parcel.parcel_type.trim().to_string(),
        declared_value: new_parcel.declared_value,
        amount_paid: new_parcel.amount_paid,
        special_instructions: new_parcel.special_instructions,
        received_by,
        received_at: now,
        current_status: ParcelStatus::Received,
        dispatched: false,
        dispatched_at: None,
        delivered: false,
        delivered_at: None,
        delivery_outcome: DeliveryOutcome::Pending,
        failure_reason: None,
        version: 0,
        updated_at: now,
    };

    let event: NewTrackingEvent = NewTrackingEvent {
        parcel_id: placeholder,
        status: ParcelStatus::Received,
        location: location.trim().to_string(),
        note: Some(String::from(INTAKE_NOTE)),
        actor: Actor::Staff(received_by),
        rider: None,
        created_at: now,
    };

    Ok(IntakeResult { parcel, event })
}

/// Applies a status change to a parcel.
///
/// The event time never goes backwards: if the clock reads earlier than the
/// parcel's last update, the last update time is used instead.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if the edge is not on the
/// requested route, or a validation error for a blank location. The input
/// parcel is never modified.
pub fn apply_transition(
    parcel: &Parcel,
    request: TransitionRequest,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    parcel
        .current_status
        .validate_transition(request.target, request.route)?;
    validate_location(&request.location)?;

    let at: OffsetDateTime = now.max(parcel.updated_at);
    let mut next: Parcel = parcel.clone();
    next.current_status = request.target;
    next.updated_at = at;

    if request.target.is_dispatch_milestone() && !next.dispatched {
        next.dispatched = true;
        next.dispatched_at = Some(at);
    }

    if request.target == ParcelStatus::Delivered {
        next.delivered = true;
        next.delivered_at = Some(at);
        next.delivery_outcome = DeliveryOutcome::Success;
        next.failure_reason = None;
    }

    next.check_invariants()?;

    let event: NewTrackingEvent = NewTrackingEvent {
        parcel_id: parcel.parcel_id,
        status: request.target,
        location: request.location.trim().to_string(),
        note: request.note,
        actor: request.actor,
        rider: request.rider,
        created_at: at,
    };

    Ok(TransitionResult {
        parcel: next,
        event,
    })
}

/// Records a failed delivery and sends the parcel back out.
///
/// Uses the retry route, so only parcels that are out for delivery or have a
/// recorded attempt qualify. The reason becomes both the parcel's
/// `failure_reason` and the event note.
///
/// # Errors
///
/// Returns an error if the reason is blank or the parcel cannot be retried.
pub fn apply_delivery_failure(
    parcel: &Parcel,
    reason: &str,
    location: &str,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    validate_failure_reason(reason)?;
    let reason: String = reason.trim().to_string();

    let request: TransitionRequest =
        TransitionRequest::standard(ParcelStatus::OutForDelivery, location, actor)
            .with_route(TransitionRoute::Retry)
            .with_note(Some(reason.clone()));

    let mut result: TransitionResult = apply_transition(parcel, request, now)?;
    result.parcel.delivery_outcome = DeliveryOutcome::Failed;
    result.parcel.delivered = false;
    result.parcel.delivered_at = None;
    result.parcel.failure_reason = Some(reason);
    result.parcel.check_invariants()?;

    Ok(result)
}
