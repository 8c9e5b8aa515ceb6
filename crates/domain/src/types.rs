// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a database-assigned identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Opaque identifier of a parcel.
    ParcelId
);
id_type!(
    /// Identifier of a delivery rider.
    RiderId
);
id_type!(
    /// Identifier of a staff member.
    StaffId
);

/// Characters allowed in the suffix of a tracking code.
///
/// Excludes `O`, `0`, `I` and `L` so codes can be read aloud over the phone.
pub const TRACKING_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ123456789";

/// Number of characters after the `TRK-` prefix.
pub const TRACKING_CODE_SUFFIX_LEN: usize = 5;

const TRACKING_CODE_PREFIX: &str = "TRK-";

/// Human-facing parcel reference printed on labels, e.g. `TRK-7HQ2M`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingCode(String);

impl TrackingCode {
    /// Parses and normalizes a tracking code.
    ///
    /// Lowercase input is accepted and uppercased.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTrackingCode` if the prefix, length or
    /// alphabet is wrong.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized: String = raw.trim().to_uppercase();
        let valid = normalized
            .strip_prefix(TRACKING_CODE_PREFIX)
            .is_some_and(|suffix| {
                suffix.len() == TRACKING_CODE_SUFFIX_LEN
                    && suffix.bytes().all(|b| TRACKING_CODE_ALPHABET.contains(&b))
            });
        if valid {
            Ok(Self(normalized))
        } else {
            Err(DomainError::InvalidTrackingCode(raw.to_string()))
        }
    }

    /// Builds a code from positions in [`TRACKING_CODE_ALPHABET`].
    ///
    /// Indices wrap around the alphabet, so every input yields a valid code.
    #[must_use]
    pub fn from_alphabet_indices(indices: [usize; TRACKING_CODE_SUFFIX_LEN]) -> Self {
        let mut code: String = String::from(TRACKING_CODE_PREFIX);
        code.extend(
            indices
                .iter()
                .map(|i| char::from(TRACKING_CODE_ALPHABET[i % TRACKING_CODE_ALPHABET.len()])),
        );
        Self(code)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One end of a shipment: the sender or the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub phone: String,
    pub location: Option<String>,
    pub country_code: Option<String>,
}

impl Party {
    #[must_use]
    pub const fn new(
        name: String,
        phone: String,
        location: Option<String>,
        country_code: Option<String>,
    ) -> Self {
        Self {
            name,
            phone,
            location,
            country_code,
        }
    }
}

/// An amount in minor currency units (cents) with its ISO 4217 code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount_minor: i64,
    pub currency: String,
}

impl Money {
    /// Creates a new amount, uppercasing the currency code.
    #[must_use]
    pub fn new(amount_minor: i64, currency: &str) -> Self {
        Self {
            amount_minor,
            currency: currency.trim().to_uppercase(),
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency: &str) -> Self {
        Self::new(0, currency)
    }
}

/// Staff roles as issued by the identity system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    SuperAdmin,
    Admin,
    Manager,
    SalesAgent,
    Receiving,
    Dispatcher,
    Delivery,
}

impl StaffRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::SalesAgent => "SALES_AGENT",
            Self::Receiving => "RECEIVING",
            Self::Dispatcher => "DISPATCHER",
            Self::Delivery => "DELIVERY",
        }
    }
}

impl FromStr for StaffRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "SALES_AGENT" => Ok(Self::SalesAgent),
            "RECEIVING" => Ok(Self::Receiving),
            "DISPATCHER" => Ok(Self::Dispatcher),
            "DELIVERY" => Ok(Self::Delivery),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff member as known to the lifecycle engine.
///
/// Credentials live with the identity system; only the attributes needed to
/// attribute tracking events and assignments are kept here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub staff_id: StaffId,
    pub full_name: String,
    pub phone: String,
    pub role: StaffRole,
    pub is_active: bool,
}

/// A delivery rider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub rider_id: RiderId,
    pub full_name: String,
    pub phone: String,
    pub vehicle_details: Option<String>,
    pub is_active: bool,
}

impl Rider {
    /// Returns an error if the rider may not take new assignments.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RiderInactive` for deactivated riders.
    pub const fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(DomainError::RiderInactive(self.rider_id))
        }
    }
}
