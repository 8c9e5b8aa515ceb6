// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use courier::{LifecycleConfig, ManualClock, SequenceCodeSource};
use courier_domain::{
    Money, NewParcel, Parcel, ParcelStatus, Party, Rider, Staff, StaffId, StaffRole,
};
use courier_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{LifecycleService, Notifier, RegisterRiderRequest, RegisterStaffRequest};

pub const T0: OffsetDateTime = datetime!(2026-03-02 08:00 UTC);

pub const SENDER_PHONE: &str = "+233 20 111 2222";
pub const RECEIVER_PHONE: &str = "+233 24 333 4444";
pub const RIDER_PHONE: &str = "+233 27 555 6666";

/// Remembers every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn messages_to(&self, phone: &str) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(to, _)| to == phone)
            .map(|(_, body)| body)
            .collect()
    }

    pub fn last_to(&self, phone: &str) -> Option<String> {
        self.messages_to(phone).pop()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, phone: &str, message: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));
        true
    }
}

/// Fails every send.
#[derive(Debug, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _phone: &str, _message: &str) -> bool {
        false
    }
}

pub type TestService = LifecycleService<RecordingNotifier, ManualClock, SequenceCodeSource>;

pub fn create_test_config() -> LifecycleConfig {
    LifecycleConfig {
        otp_hash_cost: 4,
        ..LifecycleConfig::default()
    }
}

pub fn create_test_service(codes: &[&str]) -> TestService {
    LifecycleService::new(
        Persistence::new_in_memory().unwrap(),
        RecordingNotifier::default(),
        ManualClock::new(T0),
        SequenceCodeSource::with_codes(codes.iter().copied()),
        create_test_config(),
    )
    .unwrap()
}

/// A service backed by a fresh database file, for tests that need more than
/// one connection.
pub fn create_file_service(path: &Path, codes: &[&str]) -> TestService {
    remove_database_files(path);
    LifecycleService::new(
        Persistence::new_with_file(path).unwrap(),
        RecordingNotifier::default(),
        ManualClock::new(T0),
        SequenceCodeSource::with_codes(codes.iter().copied()),
        create_test_config(),
    )
    .unwrap()
}

pub fn temp_database_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "courier_lifecycle_{name}_{}.db",
        std::process::id()
    ))
}

/// Deletes a database file along with its WAL companions.
pub fn remove_database_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

pub fn create_test_new_parcel() -> NewParcel {
    NewParcel {
        sender: Party::new(
            String::from("Ama Mensah"),
            String::from(SENDER_PHONE),
            Some(String::from("Accra")),
            Some(String::from("GH")),
        ),
        receiver: Party::new(
            String::from("Kofi Boateng"),
            String::from(RECEIVER_PHONE),
            Some(String::from("Kumasi")),
            Some(String::from("GH")),
        ),
        parcel_type: String::from("Documents"),
        declared_value: Money::new(15_000, "GHS"),
        amount_paid: Money::new(2_500, "GHS"),
        special_instructions: None,
    }
}

pub fn register_staff<N, C, S>(
    service: &mut LifecycleService<N, C, S>,
    phone: &str,
    role: StaffRole,
) -> Staff
where
    N: Notifier,
    C: courier::Clock,
    S: courier::CodeSource,
{
    service
        .register_staff(&RegisterStaffRequest {
            full_name: format!("{} Staff", role.as_str()),
            phone: phone.to_string(),
            role,
        })
        .unwrap()
}

pub fn register_rider(service: &mut TestService, phone: &str) -> Rider {
    service
        .register_rider(&RegisterRiderRequest {
            full_name: String::from("Yaw Asante"),
            phone: phone.to_string(),
            vehicle_details: Some(String::from("Motorbike GR-1234-26")),
        })
        .unwrap()
}

/// A service with one manager, one active rider and one parcel in `RECEIVED`.
pub struct Fixture {
    pub service: TestService,
    pub staff: StaffId,
    pub rider: Rider,
    pub parcel: Parcel,
}

pub fn create_fixture(codes: &[&str]) -> Fixture {
    create_fixture_with(create_test_service(codes))
}

pub fn create_fixture_with(mut service: TestService) -> Fixture {
    let staff: Staff = register_staff(&mut service, "+233 50 000 0001", StaffRole::Manager);
    let rider: Rider = register_rider(&mut service, RIDER_PHONE);
    let parcel: Parcel = service
        .create_parcel(staff.staff_id, &create_test_new_parcel())
        .unwrap();
    service.notifier().clear();
    Fixture {
        service,
        staff: staff.staff_id,
        rider,
        parcel,
    }
}

/// Like [`create_fixture`], with the parcel moved on to `PROCESSING`.
pub fn create_processing_fixture(codes: &[&str]) -> Fixture {
    advance_to_processing(create_fixture(codes))
}

/// Like [`create_processing_fixture`], with the rider assigned.
pub fn create_out_for_delivery_fixture(codes: &[&str]) -> Fixture {
    advance_to_out_for_delivery(create_processing_fixture(codes))
}

pub fn advance_to_processing(mut fixture: Fixture) -> Fixture {
    fixture
        .service
        .transition(
            fixture.parcel.parcel_id,
            ParcelStatus::Processing,
            None,
            None,
            fixture.staff,
        )
        .unwrap();
    fixture.parcel = fixture.service.get_parcel(fixture.parcel.parcel_id).unwrap();
    fixture
}

pub fn advance_to_out_for_delivery(mut fixture: Fixture) -> Fixture {
    fixture
        .service
        .assign_rider(
            fixture.parcel.parcel_id,
            fixture.rider.rider_id,
            fixture.staff,
        )
        .unwrap();
    fixture.parcel = fixture.service.get_parcel(fixture.parcel.parcel_id).unwrap();
    fixture.service.notifier().clear();
    fixture
}

/// Pulls the six-digit delivery code out of a message.
pub fn code_in(message: &str) -> String {
    message
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() == 6)
        .map(str::to_string)
        .unwrap()
}
