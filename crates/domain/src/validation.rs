// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::parcel::NewParcel;
use crate::types::{Money, Party};

/// Validates a phone number.
///
/// Accepts digits with an optional leading `+`; spaces and dashes are
/// tolerated as separators. At least seven digits are required.
///
/// # Errors
///
/// Returns `DomainError::InvalidPhone` if the number is empty or malformed.
pub fn validate_phone(phone: &str) -> Result<(), DomainError> {
    let trimmed: &str = phone.trim();
    let body: &str = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if body.is_empty() {
        return Err(DomainError::InvalidPhone(String::from(
            "Phone number cannot be empty",
        )));
    }

    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(DomainError::InvalidPhone(format!(
            "'{phone}' contains characters other than digits"
        )));
    }

    let digits: usize = body.chars().filter(char::is_ascii_digit).count();
    if digits < 7 {
        return Err(DomainError::InvalidPhone(format!(
            "'{phone}' has fewer than 7 digits"
        )));
    }

    Ok(())
}

/// Validates a name field.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is blank.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a sender or receiver.
///
/// # Errors
///
/// Returns an error if the name or phone number is invalid.
pub fn validate_party(party: &Party) -> Result<(), DomainError> {
    validate_name(&party.name)?;
    validate_phone(&party.phone)
}

/// Validates an amount of money.
///
/// # Errors
///
/// Returns an error if the amount is negative or the currency is not a
/// three-letter code.
pub fn validate_money(money: &Money) -> Result<(), DomainError> {
    if money.amount_minor < 0 {
        return Err(DomainError::InvalidAmount(money.amount_minor));
    }
    if money.currency.len() != 3 || !money.currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(DomainError::InvalidCurrency(money.currency.clone()));
    }
    Ok(())
}

/// Validates a tracking location.
///
/// # Errors
///
/// Returns `DomainError::InvalidLocation` if the location is blank.
pub fn validate_location(location: &str) -> Result<(), DomainError> {
    if location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the reason given when a delivery fails.
///
/// # Errors
///
/// Returns `DomainError::InvalidFailureReason` if the reason is blank.
pub fn validate_failure_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::InvalidFailureReason(String::from(
            "A failure reason is required",
        )));
    }
    Ok(())
}

/// Validates intake data before a parcel is created.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate_new_parcel(parcel: &NewParcel) -> Result<(), DomainError> {
    validate_party(&parcel.sender)?;
    validate_party(&parcel.receiver)?;

    if parcel.parcel_type.trim().is_empty() {
        return Err(DomainError::InvalidParcelType(String::from(
            "Parcel type cannot be empty",
        )));
    }

    validate_money(&parcel.declared_value)?;
    validate_money(&parcel.amount_paid)
}
