// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{T0, create_test_intake, create_test_parcel, create_test_staff};
use crate::{Persistence, PersistenceError};
use courier_audit::{Actor, TrackingEvent};
use courier_domain::{DeliveryOutcome, Parcel, ParcelId, ParcelStatus, TrackingCode};

#[test]
fn test_insert_parcel_round_trips_all_fields() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let staff = create_test_staff(&mut persistence);
    let intake = create_test_intake(&staff, "TRK-7HQ2M");

    let (parcel, event) = persistence.insert_parcel(&intake).unwrap();

    assert!(parcel.parcel_id.value() > 0);
    assert_eq!(parcel.version, 0);
    assert_eq!(parcel.tracking_code, intake.parcel.tracking_code);
    assert_eq!(parcel.sender, intake.parcel.sender);
    assert_eq!(parcel.receiver, intake.parcel.receiver);
    assert_eq!(parcel.declared_value, intake.parcel.declared_value);
    assert_eq!(parcel.special_instructions.as_deref(), Some("Fragile"));
    assert_eq!(parcel.received_at, T0);
    assert_eq!(parcel.current_status, ParcelStatus::Received);
    assert_eq!(parcel.delivery_outcome, DeliveryOutcome::Pending);
    assert_eq!(event.parcel_id, parcel.parcel_id);
    assert_eq!(event.actor, Actor::Staff(staff.staff_id));
}

#[test]
fn test_lookup_by_tracking_code_is_case_insensitive() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (parcel, _) = create_test_parcel(&mut persistence);

    let code = TrackingCode::parse("trk-7hq2m").unwrap();
    let found: Parcel = persistence.get_parcel_by_tracking_code(&code).unwrap();

    assert_eq!(found.parcel_id, parcel.parcel_id);
    assert!(persistence.tracking_code_exists(&code).unwrap());
}

#[test]
fn test_duplicate_tracking_code_is_rejected_without_writes() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let staff = create_test_staff(&mut persistence);
    persistence
        .insert_parcel(&create_test_intake(&staff, "TRK-7HQ2M"))
        .unwrap();

    let result = persistence.insert_parcel(&create_test_intake(&staff, "TRK-7HQ2M"));

    assert!(matches!(result, Err(PersistenceError::Duplicate(_))));
}

#[test]
fn test_unknown_parcel_is_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.get_parcel(ParcelId::new(404));

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_history_is_returned_in_insertion_order() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (parcel, first) = create_test_parcel(&mut persistence);

    persistence
        .write_parcel(parcel.parcel_id, |uow| {
            let loaded = uow.load_parcel()?;
            let mut next = loaded.clone();
            next.current_status = ParcelStatus::Processing;
            uow.store_parcel(next)?;
            uow.append_tracking_event(courier_audit::NewTrackingEvent {
                parcel_id: loaded.parcel_id,
                status: ParcelStatus::Processing,
                location: String::from("Main Office"),
                note: None,
                actor: Actor::System,
                rider: None,
                created_at: T0,
            })?;
            Ok::<(), PersistenceError>(())
        })
        .unwrap();

    let history: Vec<TrackingEvent> = persistence.get_tracking_history(parcel.parcel_id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], first);
    assert_eq!(history[1].status, ParcelStatus::Processing);
    assert!(courier_audit::is_consistent_history(
        &history,
        ParcelStatus::Processing
    ));
}
