// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use courier_domain::{Assignment, DomainError, ParcelId, Rider, RiderId, StaffId};
use time::OffsetDateTime;

/// The assignment row to write.
///
/// `assignment_id` is `None` when the parcel has no assignment yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft {
    pub assignment_id: Option<i64>,
    pub parcel_id: ParcelId,
    pub rider_id: RiderId,
    pub assigned_by: StaffId,
    pub assigned_at: OffsetDateTime,
}

impl AssignmentDraft {
    /// Combines the draft with the id the store assigned.
    #[must_use]
    pub const fn into_assignment(self, assignment_id: i64) -> Assignment {
        Assignment {
            assignment_id,
            parcel_id: self.parcel_id,
            rider_id: self.rider_id,
            assigned_by: self.assigned_by,
            assigned_at: self.assigned_at,
        }
    }
}

/// Plans binding `rider` to a parcel.
///
/// An existing assignment is overwritten in place, so a parcel never has
/// more than one.
///
/// # Errors
///
/// Returns `DomainError::RiderInactive` for deactivated riders, or an
/// invariant violation if `existing` belongs to another parcel.
pub fn plan_assignment(
    parcel_id: ParcelId,
    existing: Option<&Assignment>,
    rider: &Rider,
    assigned_by: StaffId,
    now: OffsetDateTime,
) -> Result<AssignmentDraft, CoreError> {
    rider.ensure_active()?;

    if let Some(current) = existing
        && current.parcel_id != parcel_id
    {
        return Err(CoreError::DomainViolation(DomainError::InvariantViolation(
            format!(
                "assignment {} belongs to parcel {}, not {parcel_id}",
                current.assignment_id, current.parcel_id
            ),
        )));
    }

    Ok(AssignmentDraft {
        assignment_id: existing.map(|a| a.assignment_id),
        parcel_id,
        rider_id: rider.rider_id,
        assigned_by,
        assigned_at: now,
    })
}
