// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use time::Duration;

/// Longest a delivery code may stay valid.
pub const MAX_OTP_TTL: Duration = Duration::days(7);

/// Tunables for the lifecycle engine.
///
/// Built once at start-up and handed to the orchestrator; nothing reads
/// configuration from the environment after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Number of digits in a delivery code.
    pub otp_length: usize,
    /// How long an issued code stays valid.
    pub otp_ttl: Duration,
    /// bcrypt cost used when hashing codes.
    pub otp_hash_cost: u32,
    /// Location recorded on events that do not name one.
    pub default_location: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            otp_length: 6,
            otp_ttl: Duration::minutes(30),
            otp_hash_cost: bcrypt::DEFAULT_COST,
            default_location: String::from("Main Office"),
        }
    }
}

impl LifecycleConfig {
    /// Checks that the values can actually be used.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfiguration` naming the first bad field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(4..=10).contains(&self.otp_length) {
            return Err(CoreError::InvalidConfiguration(format!(
                "otp_length must be between 4 and 10, got {}",
                self.otp_length
            )));
        }
        if self.otp_ttl <= Duration::ZERO || self.otp_ttl > MAX_OTP_TTL {
            return Err(CoreError::InvalidConfiguration(format!(
                "otp_ttl must be positive and at most {MAX_OTP_TTL}, got {}",
                self.otp_ttl
            )));
        }
        if !(4..=31).contains(&self.otp_hash_cost) {
            return Err(CoreError::InvalidConfiguration(format!(
                "otp_hash_cost must be between 4 and 31, got {}",
                self.otp_hash_cost
            )));
        }
        if self.default_location.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration(String::from(
                "default_location cannot be empty",
            )));
        }
        Ok(())
    }
}
