// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery-code issuance and verification decisions.
//!
//! Nothing here touches storage. The orchestrator loads the open challenge,
//! asks [`evaluate_challenge`] what happened and then persists the outcome
//! inside the same parcel transaction.

use crate::codes::CodeSource;
use crate::config::LifecycleConfig;
use crate::error::CoreError;
use courier_domain::OtpChallenge;
use time::OffsetDateTime;

/// A plaintext delivery code.
///
/// Exists only between issuance and the outgoing notification. `Debug` and
/// `Display` never show the digits.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Returns the digits for inclusion in the receiver's message.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpCode(<redacted>)")
    }
}

impl std::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

/// A freshly generated challenge, ready to be stored.
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub code: OtpCode,
    pub code_hash: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Generates and hashes a new delivery code.
///
/// # Errors
///
/// Returns `CoreError::Hashing` if bcrypt rejects the cost, or
/// `CoreError::InvalidConfiguration` if the expiry is not representable.
pub fn issue_challenge(
    config: &LifecycleConfig,
    codes: &dyn CodeSource,
    now: OffsetDateTime,
) -> Result<IssuedChallenge, CoreError> {
    let expires_at: OffsetDateTime = now.checked_add(config.otp_ttl).ok_or_else(|| {
        CoreError::InvalidConfiguration(format!("otp_ttl {} overflows the expiry", config.otp_ttl))
    })?;
    let code: OtpCode = OtpCode(codes.next_numeric_code(config.otp_length));
    let code_hash: String = bcrypt::hash(code.expose(), config.otp_hash_cost)?;
    Ok(IssuedChallenge {
        code,
        code_hash,
        created_at: now,
        expires_at,
    })
}

/// What a submitted code means for the open challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyDecision {
    /// The parcel has no open challenge.
    NoActiveChallenge,
    /// The open challenge is past its expiry. Nothing is consumed.
    Expired { challenge_id: i64 },
    /// The code matched. The challenge must be consumed.
    Verified { challenge_id: i64 },
    /// The code did not match. The challenge must be consumed and replaced.
    Mismatch { challenge_id: i64 },
}

/// Decides the outcome of a verification attempt.
///
/// Submissions that are not exactly `otp_length` digits are mismatches and
/// burn the code like any other wrong guess.
///
/// # Errors
///
/// Returns `CoreError::Hashing` if the stored hash is unreadable.
pub fn evaluate_challenge(
    open_challenge: Option<&OtpChallenge>,
    submitted: &str,
    config: &LifecycleConfig,
    now: OffsetDateTime,
) -> Result<VerifyDecision, CoreError> {
    let Some(challenge) = open_challenge.filter(|c| c.is_open()) else {
        return Ok(VerifyDecision::NoActiveChallenge);
    };
    let challenge_id: i64 = challenge.challenge_id;

    if challenge.is_expired_at(now) {
        return Ok(VerifyDecision::Expired { challenge_id });
    }

    let submitted: &str = submitted.trim();
    let well_formed: bool =
        submitted.len() == config.otp_length && submitted.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return Ok(VerifyDecision::Mismatch { challenge_id });
    }

    if bcrypt::verify(submitted, &challenge.code_hash)? {
        Ok(VerifyDecision::Verified { challenge_id })
    } else {
        Ok(VerifyDecision::Mismatch { challenge_id })
    }
}
