// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use courier_domain::{ParcelId, ParcelStatus};
use time::Duration;

use crate::{DeliveryInfo, LifecycleError, PublicTracking};

use super::helpers::{
    Fixture, T0, create_fixture, create_out_for_delivery_fixture, create_processing_fixture,
};

#[test]
fn test_public_tracking_lists_history_oldest_first() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);

    let tracking: PublicTracking = service
        .track(&parcel.tracking_code.as_str().to_lowercase())
        .unwrap();

    assert_eq!(tracking.tracking_code, parcel.tracking_code);
    assert_eq!(tracking.status, ParcelStatus::OutForDelivery);
    let statuses: Vec<ParcelStatus> = tracking.history.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![
            ParcelStatus::Received,
            ParcelStatus::Processing,
            ParcelStatus::OutForDelivery,
        ]
    );
}

#[test]
fn test_public_tracking_rejects_malformed_code() {
    let Fixture { mut service, .. } = create_fixture(&[]);

    let result = service.track("not-a-code");

    assert!(matches!(
        result,
        Err(LifecycleError::InvalidInput { ref field, .. }) if field == "tracking_code"
    ));
}

#[test]
fn test_public_tracking_unknown_code_is_not_found() {
    let Fixture { mut service, .. } = create_fixture(&[]);

    let result = service.track("TRK-ZZZZZ");

    assert!(matches!(result, Err(LifecycleError::NotFound(_))));
}

#[test]
fn test_delivery_info_before_assignment() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_processing_fixture(&[]);

    let info: DeliveryInfo = service.delivery_info(parcel.parcel_id).unwrap();

    assert_eq!(info.status, ParcelStatus::Processing);
    assert!(!info.dispatched);
    assert!(info.rider.is_none());
    assert!(info.assigned_at.is_none());
    assert!(!info.has_active_otp);
    assert!(info.otp_expires_at.is_none());
}

#[test]
fn test_delivery_info_shows_rider_and_code_state() {
    let Fixture {
        mut service,
        rider,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);

    let info: DeliveryInfo = service.delivery_info(parcel.parcel_id).unwrap();

    assert!(info.dispatched);
    assert_eq!(info.dispatched_at, Some(T0));
    let contact = info.rider.unwrap();
    assert_eq!(contact.rider_id, rider.rider_id);
    assert_eq!(contact.phone, rider.phone);
    assert_eq!(info.assigned_at, Some(T0));
    assert!(info.has_active_otp);
    assert_eq!(info.otp_expires_at, Some(T0 + Duration::minutes(30)));
}

#[test]
fn test_delivery_info_drops_expired_code() {
    let Fixture {
        mut service,
        parcel,
        ..
    } = create_out_for_delivery_fixture(&["246810"]);
    service.clock().advance(Duration::minutes(45));

    let info: DeliveryInfo = service.delivery_info(parcel.parcel_id).unwrap();

    assert!(!info.has_active_otp);
    assert!(info.otp_expires_at.is_none());
}

#[test]
fn test_reads_of_unknown_parcel_are_not_found() {
    let Fixture { mut service, .. } = create_fixture(&[]);
    let missing: ParcelId = ParcelId::new(9_999);

    assert!(matches!(
        service.get_parcel(missing),
        Err(LifecycleError::NotFound(_))
    ));
    assert!(matches!(
        service.tracking_history(missing),
        Err(LifecycleError::NotFound(_))
    ));
    assert!(matches!(
        service.delivery_info(missing),
        Err(LifecycleError::NotFound(_))
    ));
    assert!(matches!(
        service.list_attempts(missing),
        Err(LifecycleError::NotFound(_))
    ));
}
