// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Use-case layer for the courier parcel lifecycle engine.
//!
//! [`LifecycleService`] ties the pure decision logic in `courier` to the
//! SQLite store and to an outbound [`Notifier`]. Role checks live in
//! [`auth`] and are applied by whoever calls the service.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

pub mod auth;
mod error;
mod notify;
mod request_response;
mod service;

#[cfg(test)]
mod tests;

pub use auth::{AuthorizationService, Operation, Requirement, authorize, required_roles};
pub use error::{
    ErrorKind, LifecycleError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use notify::{Notifier, NullNotifier};
pub use request_response::{
    DeliveryInfo, DispatchOutcome, PublicTracking, PublicTrackingEntry, PurgeOutcome,
    RegisterRiderRequest, RegisterStaffRequest, RiderContact, VerifyOutcome,
};
pub use service::LifecycleService;
