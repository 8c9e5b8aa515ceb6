// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod parcel;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use parcel::{Assignment, DeliveryAttempt, NewParcel, OtpChallenge, Parcel};
pub use status::{AttemptOutcome, DeliveryOutcome, ParcelStatus, TransitionRoute, can_transition};
pub use types::{
    Money, ParcelId, Party, Rider, RiderId, Staff, StaffId, StaffRole, TRACKING_CODE_ALPHABET,
    TRACKING_CODE_SUFFIX_LEN, TrackingCode,
};
pub use validation::{
    validate_failure_reason, validate_location, validate_money, validate_name,
    validate_new_parcel, validate_party, validate_phone,
};
