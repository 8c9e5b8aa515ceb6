// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use courier::Clock;
use courier_audit::{Actor, TrackingEvent};
use courier_domain::{OtpChallenge, ParcelStatus};
use time::Duration;

use crate::{LifecycleError, VerifyOutcome};

use super::helpers::{
    Fixture, RECEIVER_PHONE, create_out_for_delivery_fixture, create_processing_fixture,
};

#[test]
fn test_correct_code_consumes_the_only_challenge() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);
    let history_before: usize = service.tracking_history(parcel.parcel_id).unwrap().len();

    let outcome: VerifyOutcome = service.verify_otp(parcel.parcel_id, "246810").unwrap();

    assert_eq!(
        outcome,
        VerifyOutcome {
            verified: true,
            rotated: false,
        }
    );

    let challenges: Vec<OtpChallenge> = service
        .persistence_mut()
        .list_challenges(parcel.parcel_id)
        .unwrap();
    assert_eq!(challenges.len(), 1);
    assert!(!challenges[0].is_open());

    assert_eq!(
        service.get_parcel(parcel.parcel_id).unwrap().current_status,
        ParcelStatus::OutForDelivery
    );
    assert_eq!(
        service.tracking_history(parcel.parcel_id).unwrap().len(),
        history_before
    );
    assert!(service.notifier().messages().is_empty());
}

#[test]
fn test_wrong_code_burns_it_and_sends_a_new_one() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810", "135790"]);

    let outcome: VerifyOutcome = service.verify_otp(parcel.parcel_id, "000000").unwrap();

    assert_eq!(
        outcome,
        VerifyOutcome {
            verified: false,
            rotated: true,
        }
    );

    let challenges: Vec<OtpChallenge> = service
        .persistence_mut()
        .list_challenges(parcel.parcel_id)
        .unwrap();
    assert_eq!(challenges.len(), 2);
    assert!(!challenges[0].is_open());
    assert!(challenges[1].is_open());
    assert_ne!(challenges[0].code_hash, challenges[1].code_hash);

    assert_eq!(
        service.notifier().last_to(RECEIVER_PHONE).unwrap(),
        "Your new delivery OTP is 135790"
    );

    // The burned code no longer works; the new one does.
    let replay: VerifyOutcome = service.verify_otp(parcel.parcel_id, "246810").unwrap();
    assert!(!replay.verified);
}

#[test]
fn test_rotated_code_verifies() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810", "135790"]);
    service.verify_otp(parcel.parcel_id, "000000").unwrap();

    let outcome: VerifyOutcome = service.verify_otp(parcel.parcel_id, "135790").unwrap();

    assert!(outcome.verified);
    assert!(!outcome.rotated);
}

#[test]
fn test_malformed_code_counts_as_a_wrong_guess() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810", "135790"]);

    let outcome: VerifyOutcome = service.verify_otp(parcel.parcel_id, "24681x").unwrap();

    assert!(outcome.rotated);
    assert_eq!(
        service
            .persistence_mut()
            .list_challenges(parcel.parcel_id)
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_expired_code_is_rejected_without_rotation() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810", "135790"]);
    service.clock().advance(Duration::minutes(31));

    let result = service.verify_otp(parcel.parcel_id, "246810");

    assert_eq!(result, Err(LifecycleError::Expired));
    let challenges: Vec<OtpChallenge> = service
        .persistence_mut()
        .list_challenges(parcel.parcel_id)
        .unwrap();
    assert_eq!(challenges.len(), 1);
    assert!(challenges[0].is_open());
    assert!(service.notifier().messages().is_empty());
}

#[test]
fn test_code_is_still_valid_at_its_expiry_instant() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);
    let open: OtpChallenge = service
        .persistence_mut()
        .get_open_challenge(parcel.parcel_id)
        .unwrap()
        .unwrap();
    service.clock().set(open.expires_at);

    let outcome: VerifyOutcome = service.verify_otp(parcel.parcel_id, "246810").unwrap();

    assert!(outcome.verified);
}

#[test]
fn test_no_open_challenge() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_processing_fixture(&[]);

    let result = service.verify_otp(parcel.parcel_id, "246810");

    assert_eq!(result, Err(LifecycleError::NoActiveChallenge));
}

#[test]
fn test_terminal_parcel_is_rejected_before_challenges_are_touched() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);
    service.confirm_delivery(parcel.parcel_id, staff).unwrap();

    let result = service.verify_otp(parcel.parcel_id, "000000");

    assert_eq!(
        result,
        Err(LifecycleError::InvalidTransition {
            from: ParcelStatus::Delivered,
            to: ParcelStatus::OutForDelivery,
        })
    );
    let challenges: Vec<OtpChallenge> = service
        .persistence_mut()
        .list_challenges(parcel.parcel_id)
        .unwrap();
    assert_eq!(challenges.len(), 1);
    assert!(challenges[0].is_open());
}

#[test]
fn test_verifying_a_dispatched_parcel_hands_it_off() {
    let Fixture {
        mut service,
        staff,
        parcel,
        ..
    } = create_processing_fixture(&["111222"]);
    service.dispatch(parcel.parcel_id, staff).unwrap();

    let outcome: VerifyOutcome = service.verify_otp(parcel.parcel_id, "111222").unwrap();

    assert!(outcome.verified);
    assert_eq!(
        service.get_parcel(parcel.parcel_id).unwrap().current_status,
        ParcelStatus::OutForDelivery
    );
    let history: Vec<TrackingEvent> = service.tracking_history(parcel.parcel_id).unwrap();
    let last: &TrackingEvent = history.last().unwrap();
    assert_eq!(last.status, ParcelStatus::OutForDelivery);
    assert_eq!(last.actor, Actor::System);
    assert_eq!(last.created_at, service.clock().now());
}
