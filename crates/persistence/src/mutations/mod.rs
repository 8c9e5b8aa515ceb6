// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! These functions assume the caller already holds the write transaction
//! that makes them atomic with their siblings.

pub mod assignments;
pub mod attempts;
pub mod challenges;
pub mod parcels;
pub mod purge;
pub mod registry;
pub mod tracking;
