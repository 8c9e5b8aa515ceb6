// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subcommands and their execution.

use std::str::FromStr;

use clap::{Args as ClapArgs, Subcommand};
use courier::{Clock, CodeSource};
use courier_domain::{
    AttemptOutcome, Money, NewParcel, ParcelId, ParcelStatus, Party, RiderId, Staff, StaffId,
    StaffRole,
};
use courier_lifecycle::{
    AuthorizationService, LifecycleError, LifecycleService, Notifier, Operation,
    RegisterRiderRequest, RegisterStaffRequest,
};
use serde_json::Value;
use tracing::info;

use crate::error::CliError;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register the first administrator of an empty database.
    InitAdmin {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: String,
    },
    /// Register a staff member.
    RegisterStaff {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: String,
        /// One of `SUPER_ADMIN`, `ADMIN`, `MANAGER`, `SALES_AGENT`, `RECEIVING`,
        /// `DISPATCHER`, `DELIVERY`.
        #[arg(long)]
        role: String,
    },
    /// Register a delivery rider.
    RegisterRider {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        vehicle: Option<String>,
    },
    /// Stop a rider from taking new assignments.
    DeactivateRider { rider_id: i64 },
    /// List riders.
    ListRiders {
        #[arg(long)]
        active_only: bool,
    },
    /// Receive a parcel at the facility.
    Intake(IntakeArgs),
    /// Dispatch a parcel and send the receiver a delivery code.
    Dispatch { parcel_id: i64 },
    /// Assign a rider and send the parcel out for delivery.
    Assign { parcel_id: i64, rider_id: i64 },
    /// Check the receiver's delivery code.
    Verify { parcel_id: i64, code: String },
    /// Record a delivery attempt without changing status.
    Attempt {
        parcel_id: i64,
        /// `SUCCESS` or `FAILED`.
        #[arg(long)]
        outcome: String,
        #[arg(long)]
        rider_id: Option<i64>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Mark a parcel delivered.
    Confirm { parcel_id: i64 },
    /// Record a failed delivery and send the parcel back out.
    Fail {
        parcel_id: i64,
        #[arg(long)]
        reason: String,
    },
    /// Move a parcel along the standard status table.
    Transition {
        parcel_id: i64,
        /// Target status, e.g. `PROCESSING` or `ARRIVED_AT_HUB`.
        status: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Show a parcel.
    Show { parcel_id: i64 },
    /// Show a parcel's full tracking history.
    History { parcel_id: i64 },
    /// Show delivery status, rider and code state.
    DeliveryInfo { parcel_id: i64 },
    /// List delivery attempts.
    Attempts { parcel_id: i64 },
    /// Public tracking by tracking code.
    Track { tracking_code: String },
    /// Delete a finished parcel and its history.
    Purge { parcel_id: i64 },
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct IntakeArgs {
    #[arg(long)]
    pub sender_name: String,
    #[arg(long)]
    pub sender_phone: String,
    #[arg(long)]
    pub sender_location: Option<String>,
    #[arg(long)]
    pub receiver_name: String,
    #[arg(long)]
    pub receiver_phone: String,
    #[arg(long)]
    pub receiver_location: Option<String>,
    #[arg(long)]
    pub country_code: Option<String>,
    #[arg(long)]
    pub parcel_type: String,
    /// Declared value in minor units.
    #[arg(long, default_value_t = 0)]
    pub declared_value: i64,
    /// Amount paid in minor units.
    #[arg(long, default_value_t = 0)]
    pub amount_paid: i64,
    #[arg(long, default_value = "GHS")]
    pub currency: String,
    #[arg(long)]
    pub instructions: Option<String>,
}

impl IntakeArgs {
    fn into_new_parcel(self) -> NewParcel {
        NewParcel {
            sender: Party::new(
                self.sender_name,
                self.sender_phone,
                self.sender_location,
                self.country_code.clone(),
            ),
            receiver: Party::new(
                self.receiver_name,
                self.receiver_phone,
                self.receiver_location,
                self.country_code,
            ),
            parcel_type: self.parcel_type,
            declared_value: Money::new(self.declared_value, &self.currency),
            amount_paid: Money::new(self.amount_paid, &self.currency),
            special_instructions: self.instructions,
        }
    }
}

impl Command {
    /// The operation checked against the acting staff member's role.
    ///
    /// `InitAdmin` has none; it is only allowed on an empty database.
    pub const fn operation(&self) -> Option<Operation> {
        let operation: Operation = match self {
            Self::InitAdmin { .. } => return None,
            Self::RegisterStaff { .. } => Operation::RegisterStaff,
            Self::RegisterRider { .. } => Operation::RegisterRider,
            Self::DeactivateRider { .. } => Operation::DeactivateRider,
            Self::ListRiders { .. } => Operation::ListRiders,
            Self::Intake(_) => Operation::Intake,
            Self::Dispatch { .. } => Operation::Dispatch,
            Self::Assign { .. } => Operation::AssignRider,
            Self::Verify { .. } => Operation::VerifyOtp,
            Self::Attempt { .. } => Operation::RecordAttempt,
            Self::Confirm { .. } => Operation::ConfirmDelivery,
            Self::Fail { .. } => Operation::MarkFailed,
            Self::Transition { .. } => Operation::Transition,
            Self::Show { .. }
            | Self::History { .. }
            | Self::DeliveryInfo { .. }
            | Self::Attempts { .. } => Operation::ViewParcel,
            Self::Track { .. } => Operation::Track,
            Self::Purge { .. } => Operation::Purge,
        };
        Some(operation)
    }
}

/// Authorizes and runs one command, returning its JSON output.
///
/// # Errors
///
/// Returns a `CliError` if authorization, input parsing or the use case
/// fails. A rejected delivery code is reported as an error after its
/// rotation has been committed.
pub fn execute<N, C, S>(
    service: &mut LifecycleService<N, C, S>,
    acting_staff: Option<StaffId>,
    command: Command,
) -> Result<Value, CliError>
where
    N: Notifier,
    C: Clock,
    S: CodeSource,
{
    let staff: Option<Staff> = match acting_staff {
        Some(staff_id) => Some(service.get_staff(staff_id)?),
        None => None,
    };

    let Some(operation) = command.operation() else {
        return init_admin(service, command);
    };
    AuthorizationService::authorize(staff.as_ref(), operation)?;
    info!(operation = operation.as_str(), "Executing command");

    let staff_id = || -> Result<StaffId, CliError> {
        staff
            .as_ref()
            .map(|s| s.staff_id)
            .ok_or_else(|| CliError::usage("--acting-staff is required"))
    };

    let output: Value = match command {
        Command::InitAdmin { .. } => return init_admin(service, command),
        Command::RegisterStaff {
            full_name,
            phone,
            role,
        } => {
            let role: StaffRole = StaffRole::from_str(&role).map_err(LifecycleError::from)?;
            serde_json::to_value(service.register_staff(&RegisterStaffRequest {
                full_name,
                phone,
                role,
            })?)?
        }
        Command::RegisterRider {
            full_name,
            phone,
            vehicle,
        } => serde_json::to_value(service.register_rider(&RegisterRiderRequest {
            full_name,
            phone,
            vehicle_details: vehicle,
        })?)?,
        Command::DeactivateRider { rider_id } => {
            serde_json::to_value(service.deactivate_rider(RiderId::new(rider_id))?)?
        }
        Command::ListRiders { active_only } => {
            serde_json::to_value(service.list_riders(active_only)?)?
        }
        Command::Intake(intake) => serde_json::to_value(
            service.create_parcel(staff_id()?, &intake.into_new_parcel())?,
        )?,
        Command::Dispatch { parcel_id } => {
            serde_json::to_value(service.dispatch(ParcelId::new(parcel_id), staff_id()?)?)?
        }
        Command::Assign {
            parcel_id,
            rider_id,
        } => serde_json::to_value(service.assign_rider(
            ParcelId::new(parcel_id),
            RiderId::new(rider_id),
            staff_id()?,
        )?)?,
        Command::Verify { parcel_id, code } => {
            let outcome = service.verify_otp(ParcelId::new(parcel_id), &code)?;
            if !outcome.verified {
                return Err(CliError::from(LifecycleError::Mismatch));
            }
            serde_json::to_value(outcome)?
        }
        Command::Attempt {
            parcel_id,
            outcome,
            rider_id,
            note,
        } => {
            let outcome: AttemptOutcome =
                AttemptOutcome::from_str(&outcome.to_uppercase()).map_err(LifecycleError::from)?;
            serde_json::to_value(service.record_attempt(
                ParcelId::new(parcel_id),
                rider_id.map(RiderId::new),
                outcome,
                note,
            )?)?
        }
        Command::Confirm { parcel_id } => serde_json::to_value(
            service.confirm_delivery(ParcelId::new(parcel_id), staff_id()?)?,
        )?,
        Command::Fail { parcel_id, reason } => serde_json::to_value(service.mark_failed(
            ParcelId::new(parcel_id),
            &reason,
            staff_id()?,
        )?)?,
        Command::Transition {
            parcel_id,
            status,
            location,
            note,
        } => {
            let status: ParcelStatus =
                ParcelStatus::from_str(&status.to_uppercase()).map_err(LifecycleError::from)?;
            serde_json::to_value(service.transition(
                ParcelId::new(parcel_id),
                status,
                location.as_deref(),
                note,
                staff_id()?,
            )?)?
        }
        Command::Show { parcel_id } => {
            serde_json::to_value(service.get_parcel(ParcelId::new(parcel_id))?)?
        }
        Command::History { parcel_id } => {
            serde_json::to_value(service.tracking_history(ParcelId::new(parcel_id))?)?
        }
        Command::DeliveryInfo { parcel_id } => {
            serde_json::to_value(service.delivery_info(ParcelId::new(parcel_id))?)?
        }
        Command::Attempts { parcel_id } => {
            serde_json::to_value(service.list_attempts(ParcelId::new(parcel_id))?)?
        }
        Command::Track { tracking_code } => serde_json::to_value(service.track(&tracking_code)?)?,
        Command::Purge { parcel_id } => {
            serde_json::to_value(service.purge_parcel(ParcelId::new(parcel_id))?)?
        }
    };

    Ok(output)
}

fn init_admin<N, C, S>(
    service: &mut LifecycleService<N, C, S>,
    command: Command,
) -> Result<Value, CliError>
where
    N: Notifier,
    C: Clock,
    S: CodeSource,
{
    let Command::InitAdmin { full_name, phone } = command else {
        return Err(CliError::internal("init_admin called for another command"));
    };
    if service.persistence_mut().has_staff()? {
        return Err(CliError::usage(
            "staff already registered; use register-staff with an administrator",
        ));
    }
    let admin: Staff = service.register_staff(&RegisterStaffRequest {
        full_name,
        phone,
        role: StaffRole::SuperAdmin,
    })?;
    Ok(serde_json::to_value(admin)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use courier::{LifecycleConfig, ManualClock, SequenceCodeSource};
    use courier_lifecycle::NullNotifier;
    use courier_persistence::Persistence;
    use time::macros::datetime;

    type TestService = LifecycleService<NullNotifier, ManualClock, SequenceCodeSource>;

    fn create_test_service(codes: &[&str]) -> TestService {
        LifecycleService::new(
            Persistence::new_in_memory().expect("Failed to create in-memory persistence"),
            NullNotifier,
            ManualClock::new(datetime!(2026-03-02 08:00 UTC)),
            SequenceCodeSource::with_codes(codes.iter().copied()),
            LifecycleConfig {
                otp_hash_cost: 4,
                ..LifecycleConfig::default()
            },
        )
        .expect("Failed to create service")
    }

    fn init(service: &mut TestService) -> StaffId {
        let admin: Value = execute(
            service,
            None,
            Command::InitAdmin {
                full_name: String::from("Root Admin"),
                phone: String::from("+233 50 000 0000"),
            },
        )
        .unwrap();
        StaffId::new(admin["staff_id"].as_i64().unwrap())
    }

    fn create_test_intake() -> IntakeArgs {
        IntakeArgs {
            sender_name: String::from("Ama Mensah"),
            sender_phone: String::from("+233 20 111 2222"),
            sender_location: Some(String::from("Accra")),
            receiver_name: String::from("Kofi Boateng"),
            receiver_phone: String::from("+233 24 333 4444"),
            receiver_location: None,
            country_code: Some(String::from("GH")),
            parcel_type: String::from("Documents"),
            declared_value: 15_000,
            amount_paid: 2_500,
            currency: String::from("GHS"),
            instructions: None,
        }
    }

    #[test]
    fn test_init_admin_only_once() {
        let mut service: TestService = create_test_service(&[]);
        init(&mut service);

        let second = execute(
            &mut service,
            None,
            Command::InitAdmin {
                full_name: String::from("Another Admin"),
                phone: String::from("+233 50 000 0009"),
            },
        );

        assert_eq!(second.unwrap_err().exit_code, 2);
    }

    #[test]
    fn test_anonymous_caller_cannot_intake() {
        let mut service: TestService = create_test_service(&[]);
        init(&mut service);

        let result = execute(&mut service, None, Command::Intake(create_test_intake()));

        let err: CliError = result.unwrap_err();
        assert_eq!(err.exit_code, 6);
        assert_eq!(err.kind, "forbidden");
    }

    #[test]
    fn test_receiving_staff_cannot_dispatch() {
        let mut service: TestService = create_test_service(&[]);
        let admin: StaffId = init(&mut service);
        let clerk: Value = execute(
            &mut service,
            Some(admin),
            Command::RegisterStaff {
                full_name: String::from("Esi Owusu"),
                phone: String::from("+233 50 000 0001"),
                role: String::from("receiving"),
            },
        )
        .unwrap();
        let clerk: StaffId = StaffId::new(clerk["staff_id"].as_i64().unwrap());
        let parcel: Value =
            execute(&mut service, Some(clerk), Command::Intake(create_test_intake())).unwrap();
        let parcel_id: i64 = parcel["parcel_id"].as_i64().unwrap();

        let result = execute(&mut service, Some(clerk), Command::Dispatch { parcel_id });

        assert_eq!(result.unwrap_err().exit_code, 6);
    }

    #[test]
    fn test_wrong_code_exits_with_verification_failure() {
        let mut service: TestService = create_test_service(&["246810", "135790"]);
        let admin: StaffId = init(&mut service);
        execute(
            &mut service,
            Some(admin),
            Command::RegisterRider {
                full_name: String::from("Yaw Asante"),
                phone: String::from("+233 27 555 6666"),
                vehicle: None,
            },
        )
        .unwrap();
        let parcel: Value =
            execute(&mut service, Some(admin), Command::Intake(create_test_intake())).unwrap();
        let parcel_id: i64 = parcel["parcel_id"].as_i64().unwrap();
        execute(
            &mut service,
            Some(admin),
            Command::Transition {
                parcel_id,
                status: String::from("processing"),
                location: None,
                note: None,
            },
        )
        .unwrap();
        execute(
            &mut service,
            Some(admin),
            Command::Assign {
                parcel_id,
                rider_id: 1,
            },
        )
        .unwrap();

        let wrong = execute(
            &mut service,
            None,
            Command::Verify {
                parcel_id,
                code: String::from("000000"),
            },
        );
        assert_eq!(wrong.unwrap_err().exit_code, 5);

        let right: Value = execute(
            &mut service,
            None,
            Command::Verify {
                parcel_id,
                code: String::from("135790"),
            },
        )
        .unwrap();
        assert_eq!(right["verified"], Value::Bool(true));
    }

    #[test]
    fn test_unknown_acting_staff_is_not_found() {
        let mut service: TestService = create_test_service(&[]);

        let result = execute(
            &mut service,
            Some(StaffId::new(77)),
            Command::ListRiders { active_only: false },
        );

        assert_eq!(result.unwrap_err().exit_code, 3);
    }

    #[test]
    fn test_public_tracking_needs_no_staff() {
        let mut service: TestService = create_test_service(&[]);
        let admin: StaffId = init(&mut service);
        let parcel: Value =
            execute(&mut service, Some(admin), Command::Intake(create_test_intake())).unwrap();
        let code: String = parcel["tracking_code"].as_str().unwrap().to_string();

        let tracking: Value = execute(
            &mut service,
            None,
            Command::Track {
                tracking_code: code.clone(),
            },
        )
        .unwrap();

        assert_eq!(tracking["tracking_code"], Value::String(code));
        assert_eq!(tracking["status"], Value::String(String::from("RECEIVED")));
        assert_eq!(tracking["history"].as_array().unwrap().len(), 1);
    }
}
