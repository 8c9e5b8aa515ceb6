// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::datetime;

use crate::{
    DeliveryOutcome, DomainError, Money, OtpChallenge, Parcel, ParcelId, ParcelStatus, Party,
    StaffId, TrackingCode,
};

fn create_test_parcel() -> Parcel {
    let at = datetime!(2026-03-01 09:00 UTC);
    Parcel {
        parcel_id: ParcelId::new(1),
        tracking_code: TrackingCode::parse("TRK-ABCDE").unwrap(),
        sender: Party::new(String::from("Sender"), String::from("+255700000001"), None, None),
        receiver: Party::new(String::from("Receiver"), String::from("+255700000002"), None, None),
        parcel_type: String::from("Box"),
        declared_value: Money::zero("USD"),
        amount_paid: Money::zero("USD"),
        special_instructions: None,
        received_by: StaffId::new(1),
        received_at: at,
        current_status: ParcelStatus::Received,
        dispatched: false,
        dispatched_at: None,
        delivered: false,
        delivered_at: None,
        delivery_outcome: DeliveryOutcome::Pending,
        failure_reason: None,
        version: 1,
        updated_at: at,
    }
}

#[test]
fn test_fresh_parcel_satisfies_invariants() {
    assert!(create_test_parcel().check_invariants().is_ok());
}

#[test]
fn test_delivered_flag_without_status_is_rejected() {
    let mut parcel = create_test_parcel();
    parcel.delivered = true;
    parcel.delivered_at = Some(parcel.updated_at);
    assert!(matches!(
        parcel.check_invariants(),
        Err(DomainError::InvariantViolation(_))
    ));
}

#[test]
fn test_delivered_status_requires_success_outcome() {
    let mut parcel = create_test_parcel();
    parcel.current_status = ParcelStatus::Delivered;
    parcel.delivered = true;
    parcel.delivered_at = Some(parcel.updated_at);
    assert!(parcel.check_invariants().is_err());

    parcel.delivery_outcome = DeliveryOutcome::Success;
    assert!(parcel.check_invariants().is_ok());
}

#[test]
fn test_failure_reason_requires_failed_outcome() {
    let mut parcel = create_test_parcel();
    parcel.failure_reason = Some(String::from("Receiver absent"));
    assert!(parcel.check_invariants().is_err());

    parcel.delivery_outcome = DeliveryOutcome::Failed;
    assert!(parcel.check_invariants().is_ok());
}

#[test]
fn test_dispatched_flag_must_match_timestamp() {
    let mut parcel = create_test_parcel();
    parcel.dispatched = true;
    assert!(parcel.check_invariants().is_err());
}

#[test]
fn test_challenge_expiry_is_strict() {
    let challenge = OtpChallenge {
        challenge_id: 1,
        parcel_id: ParcelId::new(1),
        code_hash: String::from("hash"),
        created_at: datetime!(2026-03-01 09:00 UTC),
        expires_at: datetime!(2026-03-01 09:30 UTC),
        consumed_at: None,
    };
    assert!(challenge.is_open());
    assert!(!challenge.is_expired_at(datetime!(2026-03-01 09:30 UTC)));
    assert!(challenge.is_expired_at(datetime!(2026-03-01 09:30:01 UTC)));
}
