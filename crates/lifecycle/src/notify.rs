// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound notifications.
//!
//! Messages go out after the use case has committed. A failed send is
//! logged and otherwise ignored.

use courier::OtpCode;
use courier_domain::{Parcel, ParcelStatus, Rider};
use tracing::warn;

/// Delivers a text message to a phone number.
pub trait Notifier: Send + Sync {
    /// Sends `message` to `phone`. Returns `false` if delivery failed.
    fn notify(&self, phone: &str, message: &str) -> bool;
}

/// A notifier that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _phone: &str, _message: &str) -> bool {
        true
    }
}

/// Who a message is addressed to. Used only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recipient {
    Sender,
    Receiver,
    Rider,
}

impl Recipient {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Sender => "sender",
            Self::Receiver => "receiver",
            Self::Rider => "rider",
        }
    }
}

/// A message that has been composed and is waiting for the commit.
pub(crate) struct Outgoing {
    pub recipient: Recipient,
    pub phone: String,
    pub body: String,
}

impl Outgoing {
    fn to_sender(parcel: &Parcel, body: String) -> Self {
        Self {
            recipient: Recipient::Sender,
            phone: parcel.sender.phone.clone(),
            body,
        }
    }

    fn to_receiver(parcel: &Parcel, body: String) -> Self {
        Self {
            recipient: Recipient::Receiver,
            phone: parcel.receiver.phone.clone(),
            body,
        }
    }
}

/// Sends each message, logging failures without their contents.
pub(crate) fn deliver(
    notifier: &dyn Notifier,
    parcel: &Parcel,
    purpose: &str,
    outgoing: Vec<Outgoing>,
) {
    for message in outgoing {
        if !notifier.notify(&message.phone, &message.body) {
            warn!(
                parcel_id = parcel.parcel_id.value(),
                purpose,
                recipient = message.recipient.as_str(),
                "Notification could not be delivered"
            );
        }
    }
}

fn location_or_unknown(location: Option<&String>) -> &str {
    location.map_or("unknown location", String::as_str)
}

pub(crate) fn intake_messages(parcel: &Parcel) -> Vec<Outgoing> {
    let code: &str = parcel.tracking_code.as_str();
    vec![
        Outgoing::to_sender(parcel, format!("Parcel {code} received at origin.")),
        Outgoing::to_receiver(
            parcel,
            format!("Parcel for you ({code}) has been received and will be dispatched soon."),
        ),
    ]
}

pub(crate) fn dispatch_messages(parcel: &Parcel, otp: &OtpCode) -> Vec<Outgoing> {
    vec![
        Outgoing::to_sender(
            parcel,
            format!("Parcel {} dispatched.", parcel.tracking_code),
        ),
        Outgoing::to_receiver(parcel, format!("Your delivery OTP is {}", otp.expose())),
    ]
}

pub(crate) fn assignment_messages(
    parcel: &Parcel,
    rider: &Rider,
    otp: &OtpCode,
) -> Vec<Outgoing> {
    let code: &str = parcel.tracking_code.as_str();
    vec![
        Outgoing::to_sender(
            parcel,
            format!(
                "Parcel {code} has been assigned to rider {} ({}). Your parcel is now out for delivery!",
                rider.full_name, rider.phone
            ),
        ),
        Outgoing::to_receiver(
            parcel,
            format!(
                "Your parcel {code} is out for delivery! Rider: {} ({}). Delivery OTP: {}. Please have this code ready when the rider arrives.",
                rider.full_name,
                rider.phone,
                otp.expose()
            ),
        ),
        Outgoing {
            recipient: Recipient::Rider,
            phone: rider.phone.clone(),
            body: format!(
                "You have been assigned parcel {code}. Pickup from: {} ({}) at {}. Deliver to: {} ({}) at {}.",
                parcel.sender.name,
                parcel.sender.phone,
                location_or_unknown(parcel.sender.location.as_ref()),
                parcel.receiver.name,
                parcel.receiver.phone,
                location_or_unknown(parcel.receiver.location.as_ref()),
            ),
        },
    ]
}

pub(crate) fn rotation_messages(parcel: &Parcel, otp: &OtpCode) -> Vec<Outgoing> {
    vec![Outgoing::to_receiver(
        parcel,
        format!("Your new delivery OTP is {}", otp.expose()),
    )]
}

pub(crate) fn delivered_messages(parcel: &Parcel) -> Vec<Outgoing> {
    let code: &str = parcel.tracking_code.as_str();
    vec![
        Outgoing::to_sender(parcel, format!("Parcel {code} delivered successfully.")),
        Outgoing::to_receiver(parcel, format!("Your parcel {code} has been delivered.")),
    ]
}

/// Receiver update for a generic transition. Only sent for OFD and DELIVERED.
pub(crate) fn status_update_messages(parcel: &Parcel) -> Vec<Outgoing> {
    let status: ParcelStatus = parcel.current_status;
    let suffix: &str = match status {
        ParcelStatus::OutForDelivery => ". Delivery is on the way!",
        ParcelStatus::Delivered => "",
        _ => return Vec::new(),
    };
    vec![Outgoing::to_receiver(
        parcel,
        format!(
            "Your parcel {} status updated to: {status}{suffix}",
            parcel.tracking_code
        ),
    )]
}
