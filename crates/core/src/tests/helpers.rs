// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{LifecycleConfig, receive_parcel};
use courier_domain::{
    Money, NewParcel, Parcel, ParcelId, ParcelStatus, Party, Rider, RiderId, StaffId,
    TrackingCode,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const INTAKE_TIME: OffsetDateTime = datetime!(2026-03-02 08:00 UTC);

pub fn create_test_config() -> LifecycleConfig {
    LifecycleConfig {
        otp_hash_cost: 4,
        ..LifecycleConfig::default()
    }
}

pub fn create_test_new_parcel() -> NewParcel {
    NewParcel {
        sender: Party::new(
            String::from("Ama Mensah"),
            String::from("+233 20 111 2222"),
            Some(String::from("Accra")),
            Some(String::from("GH")),
        ),
        receiver: Party::new(
            String::from("Kofi Boateng"),
            String::from("+233 24 333 4444"),
            Some(String::from("Kumasi")),
            Some(String::from("GH")),
        ),
        parcel_type: String::from("Documents"),
        declared_value: Money::new(15_000, "ghs"),
        amount_paid: Money::new(2_500, "GHS"),
        special_instructions: None,
    }
}

pub fn create_test_parcel() -> Parcel {
    let mut parcel: Parcel = receive_parcel(
        create_test_new_parcel(),
        TrackingCode::parse("TRK-7HQ2M").unwrap(),
        StaffId::new(1),
        "Main Office",
        INTAKE_TIME,
    )
    .unwrap()
    .parcel;
    parcel.parcel_id = ParcelId::new(1);
    parcel
}

/// A parcel forced into `status` with consistent flags.
pub fn create_test_parcel_in(status: ParcelStatus) -> Parcel {
    let mut parcel: Parcel = create_test_parcel();
    parcel.current_status = status;
    if matches!(
        status,
        ParcelStatus::InTransit
            | ParcelStatus::ArrivedAtHub
            | ParcelStatus::OutForDelivery
            | ParcelStatus::DeliveryAttempted
    ) {
        parcel.dispatched = true;
        parcel.dispatched_at = Some(INTAKE_TIME);
    }
    parcel
}

pub fn create_test_rider(active: bool) -> Rider {
    Rider {
        rider_id: RiderId::new(7),
        full_name: String::from("Yaw Asante"),
        phone: String::from("+233 27 555 6666"),
        vehicle_details: Some(String::from("Motorbike GR-1234-26")),
        is_active: active,
    }
}
