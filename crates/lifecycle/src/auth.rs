// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role checks for lifecycle operations.
//!
//! The orchestrator never looks at roles. Callers at the boundary check the
//! acting staff member here before invoking a use case.

use courier_domain::{Staff, StaffRole};

use crate::error::LifecycleError;

/// Every operation a caller can ask the lifecycle layer to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Intake,
    Dispatch,
    AssignRider,
    VerifyOtp,
    RecordAttempt,
    ConfirmDelivery,
    MarkFailed,
    Transition,
    ViewParcel,
    ListRiders,
    Track,
    RegisterStaff,
    RegisterRider,
    DeactivateRider,
    Purge,
}

impl Operation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Dispatch => "dispatch",
            Self::AssignRider => "assign_rider",
            Self::VerifyOtp => "verify_otp",
            Self::RecordAttempt => "record_attempt",
            Self::ConfirmDelivery => "confirm_delivery",
            Self::MarkFailed => "mark_failed",
            Self::Transition => "transition",
            Self::ViewParcel => "view_parcel",
            Self::ListRiders => "list_riders",
            Self::Track => "track",
            Self::RegisterStaff => "register_staff",
            Self::RegisterRider => "register_rider",
            Self::DeactivateRider => "deactivate_rider",
            Self::Purge => "purge",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone, including unauthenticated callers.
    Public,
    /// Any active staff member.
    AnyStaff,
    /// Active staff holding one of these roles.
    Roles(&'static [StaffRole]),
}

const DISPATCH_ROLES: &[StaffRole] = &[
    StaffRole::Dispatcher,
    StaffRole::Manager,
    StaffRole::Admin,
    StaffRole::SuperAdmin,
];

const DELIVERY_ROLES: &[StaffRole] = &[
    StaffRole::Delivery,
    StaffRole::Manager,
    StaffRole::Admin,
    StaffRole::SuperAdmin,
];

const MANAGEMENT_ROLES: &[StaffRole] =
    &[StaffRole::Manager, StaffRole::Admin, StaffRole::SuperAdmin];

const ADMIN_ROLES: &[StaffRole] = &[StaffRole::Admin, StaffRole::SuperAdmin];

/// Returns who may perform `operation`.
#[must_use]
pub const fn required_roles(operation: Operation) -> Requirement {
    match operation {
        Operation::Dispatch | Operation::AssignRider => Requirement::Roles(DISPATCH_ROLES),
        Operation::RecordAttempt | Operation::ConfirmDelivery | Operation::MarkFailed => {
            Requirement::Roles(DELIVERY_ROLES)
        }
        Operation::RegisterRider => Requirement::Roles(MANAGEMENT_ROLES),
        Operation::RegisterStaff | Operation::DeactivateRider | Operation::Purge => {
            Requirement::Roles(ADMIN_ROLES)
        }
        Operation::Intake
        | Operation::Transition
        | Operation::ViewParcel
        | Operation::ListRiders => Requirement::AnyStaff,
        Operation::VerifyOtp | Operation::Track => Requirement::Public,
    }
}

/// Decides whether a caller with `role` satisfies `requirement`.
///
/// `None` is an unauthenticated caller.
#[must_use]
pub fn authorize(role: Option<StaffRole>, requirement: Requirement) -> bool {
    match (requirement, role) {
        (Requirement::Public, _) => true,
        (Requirement::AnyStaff, Some(_)) => true,
        (Requirement::Roles(allowed), Some(role)) => allowed.contains(&role),
        (Requirement::AnyStaff | Requirement::Roles(_), None) => false,
    }
}

/// Authorization service for lifecycle operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks whether `staff` may perform `operation`.
    ///
    /// Deactivated staff are treated like unauthenticated callers.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::Unauthorized` if the check fails.
    pub fn authorize(staff: Option<&Staff>, operation: Operation) -> Result<(), LifecycleError> {
        let role: Option<StaffRole> = staff.filter(|s| s.is_active).map(|s| s.role);

        if authorize(role, required_roles(operation)) {
            Ok(())
        } else {
            Err(LifecycleError::Unauthorized {
                operation: operation.as_str().to_string(),
                role: role.map_or_else(|| String::from("anonymous"), |r| r.as_str().to_string()),
            })
        }
    }
}
