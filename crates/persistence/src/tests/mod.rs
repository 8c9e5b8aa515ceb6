// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod parcel_tests;

use courier::{IntakeResult, receive_parcel};
use courier_audit::TrackingEvent;
use courier_domain::{Money, NewParcel, Parcel, Party, Rider, Staff, StaffRole, TrackingCode};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

pub const T0: OffsetDateTime = datetime!(2026-03-02 08:00 UTC);

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
            None,
            None,
        ),
        parcel_type: String::from("Electronics"),
        declared_value: Money::new(120_000, "GHS"),
        amount_paid: Money::new(4_500, "GHS"),
        special_instructions: Some(String::from("Fragile")),
    }
}

pub fn create_test_staff(persistence: &mut Persistence) -> Staff {
    persistence
        .create_staff("Esi Owusu", "+233 50 000 0001", StaffRole::Receiving, T0)
        .unwrap()
}

pub fn create_test_rider(persistence: &mut Persistence, phone: &str) -> Rider {
    persistence
        .create_rider("Yaw Asante", phone, Some("Motorbike"), T0)
        .unwrap()
}

pub fn create_test_intake(staff: &Staff, code: &str) -> IntakeResult {
    receive_parcel(
        create_test_new_parcel(),
        TrackingCode::parse(code).unwrap(),
        staff.staff_id,
        "Main Office",
        T0,
    )
    .unwrap()
}

/// A database with one staff member and one freshly received parcel.
pub fn create_test_parcel(persistence: &mut Persistence) -> (Parcel, TrackingEvent) {
    let staff: Staff = create_test_staff(persistence);
    persistence
        .insert_parcel(&create_test_intake(&staff, "TRK-7HQ2M"))
        .unwrap()
}
