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
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod commands;
mod error;
mod notifier;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use courier::{LifecycleConfig, MAX_OTP_TTL, RandomCodeSource, SystemClock};
use courier_domain::StaffId;
use courier_lifecycle::LifecycleService;
use courier_persistence::Persistence;
use serde_json::Value;
use time::Duration;
use tracing::{error, info};

use crate::commands::{Command, execute};
use crate::error::CliError;
use crate::notifier::ConsoleNotifier;

/// Courier - parcel intake, dispatch and delivery from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file.
    #[arg(short, long, default_value = "courier.db")]
    database: String,

    /// Number of digits in a delivery code
    #[arg(long, default_value_t = 6)]
    otp_length: usize,

    /// Minutes a delivery code stays valid (at most 7 days)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(1..=MAX_OTP_TTL_MINUTES))]
    otp_ttl_minutes: i64,

    /// bcrypt cost for hashing delivery codes
    #[arg(long)]
    otp_hash_cost: Option<u32>,

    /// Location recorded on events that do not name one
    #[arg(long)]
    default_location: Option<String>,

    /// Staff id the command is performed as
    #[arg(short = 's', long)]
    acting_staff: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn lifecycle_config(&self) -> LifecycleConfig {
        let defaults: LifecycleConfig = LifecycleConfig::default();
        LifecycleConfig {
            otp_length: self.otp_length,
            otp_ttl: Duration::minutes(self.otp_ttl_minutes),
            otp_hash_cost: self.otp_hash_cost.unwrap_or(defaults.otp_hash_cost),
            default_location: self
                .default_location
                .clone()
                .unwrap_or(defaults.default_location),
        }
    }
}

const MAX_OTP_TTL_MINUTES: i64 = MAX_OTP_TTL.whole_minutes();

type CliService = LifecycleService<ConsoleNotifier, SystemClock, RandomCodeSource>;

fn run(args: Args) -> Result<Value, CliError> {
    let config: LifecycleConfig = args.lifecycle_config();
    info!(database = %args.database, "Opening database");
    let persistence: Persistence = Persistence::new_with_file(&args.database)?;
    let mut service: CliService = LifecycleService::new(
        persistence,
        ConsoleNotifier,
        SystemClock,
        RandomCodeSource,
        config,
    )?;

    execute(
        &mut service,
        args.acting_staff.map(StaffId::new),
        args.command,
    )
}

fn print_json<T: serde::Serialize>(value: &T) {
    let mut stdout = std::io::stdout().lock();
    let written = serde_json::to_writer_pretty(&mut stdout, value)
        .map_err(std::io::Error::from)
        .and_then(|()| writeln!(stdout));
    if let Err(e) = written {
        error!(error = %e, "Failed to write output");
    }
}

fn main() -> ExitCode {
    let args: Args = Args::parse();

    // Logs go to stderr so stdout carries only the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(output) => {
            print_json(&output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind, "{}", e.message);
            print_json(&e.response());
            ExitCode::from(e.exit_code)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_defaults_match_lifecycle_config() {
        let args: Args = Args::try_parse_from(["courier", "track", "TRK-AAAAB"]).unwrap();

        assert_eq!(args.database, "courier.db");
        assert_eq!(args.acting_staff, None);
        assert_eq!(args.lifecycle_config(), LifecycleConfig::default());
        assert_eq!(
            args.command,
            Command::Track {
                tracking_code: String::from("TRK-AAAAB")
            }
        );
    }

    #[test]
    fn test_overrides_reach_config() {
        let args: Args = Args::try_parse_from([
            "courier",
            "--otp-length",
            "8",
            "--otp-ttl-minutes",
            "5",
            "--otp-hash-cost",
            "4",
            "--default-location",
            "Kumasi Hub",
            "-s",
            "3",
            "dispatch",
            "42",
        ])
        .unwrap();
        let config: LifecycleConfig = args.lifecycle_config();

        assert_eq!(config.otp_length, 8);
        assert_eq!(config.otp_ttl, Duration::minutes(5));
        assert_eq!(config.otp_hash_cost, 4);
        assert_eq!(config.default_location, "Kumasi Hub");
        assert_eq!(args.acting_staff, Some(3));
        assert_eq!(args.command, Command::Dispatch { parcel_id: 42 });
    }

    #[test]
    fn test_intake_flags() {
        let args: Args = Args::try_parse_from([
            "courier",
            "intake",
            "--sender-name",
            "Ama Mensah",
            "--sender-phone",
            "+233 20 111 2222",
            "--receiver-name",
            "Kofi Boateng",
            "--receiver-phone",
            "+233 24 333 4444",
            "--parcel-type",
            "Documents",
            "--amount-paid",
            "2500",
        ])
        .unwrap();

        let Command::Intake(intake) = args.command else {
            panic!("expected the intake subcommand");
        };
        assert_eq!(intake.amount_paid, 2500);
        assert_eq!(intake.declared_value, 0);
        assert_eq!(intake.currency, "GHS");
    }

    #[test]
    fn test_otp_ttl_minutes_is_bounded() {
        let too_long = Args::try_parse_from([
            "courier",
            "--otp-ttl-minutes",
            "9223372036854775807",
            "track",
            "TRK-AAAAB",
        ]);
        assert!(too_long.is_err());

        let zero = Args::try_parse_from(["courier", "--otp-ttl-minutes", "0", "track", "TRK-AAAAB"]);
        assert!(zero.is_err());

        let week: Args = Args::try_parse_from([
            "courier",
            "--otp-ttl-minutes",
            "10080",
            "track",
            "TRK-AAAAB",
        ])
        .unwrap();
        assert_eq!(week.lifecycle_config().otp_ttl, MAX_OTP_TTL);
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Args::try_parse_from(["courier"]).is_err());
    }

    #[test]
    fn test_bad_config_is_invalid_request() {
        let config: LifecycleConfig = LifecycleConfig {
            otp_length: 2,
            ..LifecycleConfig::default()
        };
        let result = LifecycleService::new(
            Persistence::new_in_memory().unwrap(),
            ConsoleNotifier,
            SystemClock,
            RandomCodeSource,
            config,
        );

        let err: CliError = CliError::from(result.err().unwrap());
        assert_eq!(err.exit_code, 2);
    }
}
