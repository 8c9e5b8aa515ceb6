// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use courier::{ManualClock, SequenceCodeSource};
use courier_audit::TrackingEvent;
use courier_domain::{
    AttemptOutcome, DeliveryAttempt, DeliveryOutcome, Parcel, ParcelStatus, Rider, RiderId,
    Staff, StaffRole,
};
use courier_persistence::Persistence;

use crate::{LifecycleError, LifecycleService, RegisterRiderRequest};

use super::helpers::{
    FailingNotifier, Fixture, RECEIVER_PHONE, RIDER_PHONE, SENDER_PHONE, T0, create_fixture,
    create_out_for_delivery_fixture, create_processing_fixture, create_test_config,
    create_test_new_parcel, register_staff,
};

#[test]
fn test_record_attempt_leaves_status_alone() {
    let Fixture {
        mut service,
        rider,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);

    let attempt: DeliveryAttempt = service
        .record_attempt(
            parcel.parcel_id,
            Some(rider.rider_id),
            AttemptOutcome::Failed,
            Some(String::from("  Receiver not home  ")),
        )
        .unwrap();

    assert_eq!(attempt.rider_id, Some(rider.rider_id));
    assert_eq!(attempt.outcome, AttemptOutcome::Failed);
    assert_eq!(attempt.note.as_deref(), Some("Receiver not home"));
    assert_eq!(attempt.attempted_at, T0);
    assert_eq!(service.get_parcel(parcel.parcel_id).unwrap(), parcel);
    assert_eq!(service.list_attempts(parcel.parcel_id).unwrap(), vec![attempt]);
}

#[test]
fn test_record_attempt_is_allowed_in_any_status() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_fixture(&[]);

    let attempt: DeliveryAttempt = service
        .record_attempt(parcel.parcel_id, None, AttemptOutcome::Success, Some(String::from(" ")))
        .unwrap();

    assert_eq!(attempt.rider_id, None);
    assert_eq!(attempt.note, None);
}

#[test]
fn test_record_attempt_with_unknown_rider_is_not_found() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_fixture(&[]);

    let result = service.record_attempt(
        parcel.parcel_id,
        Some(RiderId::new(404)),
        AttemptOutcome::Failed,
        None,
    );

    assert!(matches!(result, Err(LifecycleError::NotFound(_))));
    assert!(service.list_attempts(parcel.parcel_id).unwrap().is_empty());
}

#[test]
fn test_confirm_delivery_completes_the_parcel() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);

    let delivered: Parcel = service.confirm_delivery(parcel.parcel_id, staff).unwrap();

    assert_eq!(delivered.current_status, ParcelStatus::Delivered);
    assert!(delivered.delivered);
    assert_eq!(delivered.delivered_at, Some(T0));
    assert_eq!(delivered.delivery_outcome, DeliveryOutcome::Success);
    assert_eq!(delivered.version, parcel.version + 1);

    let code = parcel.tracking_code.as_str();
    assert_eq!(
        service.notifier().last_to(SENDER_PHONE).unwrap(),
        format!("Parcel {code} delivered successfully.")
    );
    assert_eq!(
        service.notifier().last_to(RECEIVER_PHONE).unwrap(),
        format!("Your parcel {code} has been delivered.")
    );
}

#[test]
fn test_confirm_delivery_requires_parcel_out_for_delivery() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_processing_fixture(&[]);

    let result = service.confirm_delivery(parcel.parcel_id, staff);

    assert_eq!(
        result,
        Err(LifecycleError::InvalidTransition {
            from: ParcelStatus::Processing,
            to: ParcelStatus::Delivered,
        })
    );
}

#[test]
fn test_mark_failed_records_reason_and_sends_parcel_back_out() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);

    let failed: Parcel = service
        .mark_failed(parcel.parcel_id, " Address not found ", staff)
        .unwrap();

    assert_eq!(failed.current_status, ParcelStatus::OutForDelivery);
    assert_eq!(failed.delivery_outcome, DeliveryOutcome::Failed);
    assert_eq!(failed.failure_reason.as_deref(), Some("Address not found"));
    assert!(!failed.delivered);

    let history: Vec<TrackingEvent> = service.tracking_history(parcel.parcel_id).unwrap();
    assert_eq!(
        history.last().unwrap().note.as_deref(),
        Some("Address not found")
    );
}

#[test]
fn test_mark_failed_after_attempted_delivery() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);
    service
        .transition(
            parcel.parcel_id,
            ParcelStatus::DeliveryAttempted,
            None,
            None,
            staff,
        )
        .unwrap();

    let failed: Parcel = service
        .mark_failed(parcel.parcel_id, "Gate locked", staff)
        .unwrap();

    assert_eq!(failed.current_status, ParcelStatus::OutForDelivery);
}

#[test]
fn test_mark_failed_rejects_blank_reason() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);

    let result = service.mark_failed(parcel.parcel_id, "   ", staff);

    assert!(matches!(
        result,
        Err(LifecycleError::InvalidInput { ref field, .. }) if field == "reason"
    ));
}

#[test]
fn test_mark_failed_requires_delivery_in_progress() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_processing_fixture(&[]);

    let result = service.mark_failed(parcel.parcel_id, "Address not found", staff);

    assert_eq!(
        result,
        Err(LifecycleError::InvalidTransition {
            from: ParcelStatus::Processing,
            to: ParcelStatus::OutForDelivery,
        })
    );
}

#[test]
fn test_transition_records_location_and_note() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);

    let event: TrackingEvent = service
        .transition(
            parcel.parcel_id,
            ParcelStatus::DeliveryAttempted,
            Some("Kumasi, Adum"),
            Some(String::from("Receiver asked to come back later")),
            staff,
        )
        .unwrap();

    assert_eq!(event.status, ParcelStatus::DeliveryAttempted);
    assert_eq!(event.location, "Kumasi, Adum");
    assert_eq!(
        event.note.as_deref(),
        Some("Receiver asked to come back later")
    );
    assert!(service.notifier().messages().is_empty());
}

#[test]
fn test_transition_to_delivered_notifies_receiver() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);

    service
        .transition(parcel.parcel_id, ParcelStatus::Delivered, None, None, staff)
        .unwrap();

    assert_eq!(
        service.notifier().last_to(RECEIVER_PHONE).unwrap(),
        format!(
            "Your parcel {} status updated to: DELIVERED",
            parcel.tracking_code
        )
    );
}

#[test]
fn test_transition_rejects_blank_location() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_fixture(&[]);

    let result = service.transition(
        parcel.parcel_id,
        ParcelStatus::Processing,
        Some("  "),
        None,
        staff,
    );

    assert!(matches!(
        result,
        Err(LifecycleError::InvalidInput { ref field, .. }) if field == "location"
    ));
    assert_eq!(
        service.get_parcel(parcel.parcel_id).unwrap().current_status,
        ParcelStatus::Received
    );
}

#[test]
fn test_transition_off_the_table_is_rejected() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_fixture(&[]);

    let result = service.transition(parcel.parcel_id, ParcelStatus::Delivered, None, None, staff);

    assert_eq!(
        result,
        Err(LifecycleError::InvalidTransition {
            from: ParcelStatus::Received,
            to: ParcelStatus::Delivered,
        })
    );
    assert_eq!(service.tracking_history(parcel.parcel_id).unwrap().len(), 1);
}

#[test]
fn test_failed_notifications_do_not_fail_use_cases() {
    let mut service = LifecycleService::new(
        Persistence::new_in_memory().unwrap(),
        FailingNotifier,
        ManualClock::new(T0),
        SequenceCodeSource::with_codes(["246810"]),
        create_test_config(),
    )
    .unwrap();
    let staff: Staff = register_staff(&mut service, "+233 50 000 0001", StaffRole::Manager);
    let rider: Rider = service
        .register_rider(&RegisterRiderRequest {
            full_name: String::from("Yaw Asante"),
            phone: String::from(RIDER_PHONE),
            vehicle_details: None,
        })
        .unwrap();

    let parcel: Parcel = service
        .create_parcel(staff.staff_id, &create_test_new_parcel())
        .unwrap();
    service
        .transition(
            parcel.parcel_id,
            ParcelStatus::Processing,
            None,
            None,
            staff.staff_id,
        )
        .unwrap();
    service
        .assign_rider(parcel.parcel_id, rider.rider_id, staff.staff_id)
        .unwrap();
    assert!(service.verify_otp(parcel.parcel_id, "246810").unwrap().verified);
    let delivered: Parcel = service
        .confirm_delivery(parcel.parcel_id, staff.staff_id)
        .unwrap();

    assert_eq!(delivered.current_status, ParcelStatus::Delivered);
}
