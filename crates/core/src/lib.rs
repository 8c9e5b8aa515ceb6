// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure decision logic for the courier parcel lifecycle engine.
//!
//! This crate decides what a request does to a parcel. It never performs
//! I/O: storage and notifications belong to the callers.

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

mod assignment;
mod clock;
mod codes;
mod config;
mod error;
mod otp;
mod transition;

#[cfg(test)]
mod tests;

pub use assignment::{AssignmentDraft, plan_assignment};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codes::{CodeSource, RandomCodeSource, SequenceCodeSource};
pub use config::{LifecycleConfig, MAX_OTP_TTL};
pub use error::CoreError;
pub use otp::{IssuedChallenge, OtpCode, VerifyDecision, evaluate_challenge, issue_challenge};
pub use transition::{
    INTAKE_NOTE, IntakeResult, TransitionRequest, TransitionResult, apply_delivery_failure,
    apply_transition, receive_parcel,
};
