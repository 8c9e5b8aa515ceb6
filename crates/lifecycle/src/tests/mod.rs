// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the lifecycle crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod delivery_tests;
mod helpers;
mod read_tests;
mod verify_tests;
