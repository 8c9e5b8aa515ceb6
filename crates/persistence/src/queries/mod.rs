// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every function takes a plain connection so the same query serves both
//! the read API on `Persistence` and the unit of work inside a write
//! transaction.

pub mod assignments;
pub mod attempts;
pub mod challenges;
pub mod parcels;
pub mod registry;
pub mod tracking;
