// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Generators for delivery codes and tracking codes.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use courier_domain::{TRACKING_CODE_ALPHABET, TRACKING_CODE_SUFFIX_LEN, TrackingCode};

/// Supplies unpredictable codes.
pub trait CodeSource: Send + Sync {
    /// Returns `length` decimal digits.
    fn next_numeric_code(&self, length: usize) -> String;

    /// Returns a fresh human-facing tracking code.
    fn next_tracking_code(&self) -> TrackingCode;
}

/// Codes drawn from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeSource;

impl CodeSource for RandomCodeSource {
    fn next_numeric_code(&self, length: usize) -> String {
        (0..length)
            .map(|_| char::from(b'0' + rand::random_range(0..10u8)))
            .collect()
    }

    fn next_tracking_code(&self) -> TrackingCode {
        let indices: [usize; TRACKING_CODE_SUFFIX_LEN] =
            std::array::from_fn(|_| rand::random_range(0..TRACKING_CODE_ALPHABET.len()));
        TrackingCode::from_alphabet_indices(indices)
    }
}

/// Hands out queued codes first, then a deterministic counter.
///
/// Lets tests know every code the engine will issue.
#[derive(Debug, Default)]
pub struct SequenceCodeSource {
    numeric: Mutex<VecDeque<String>>,
    counter: Mutex<u64>,
}

impl SequenceCodeSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source that will return `codes` in order.
    #[must_use]
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            numeric: Mutex::new(codes.into_iter().map(Into::into).collect()),
            counter: Mutex::new(0),
        }
    }

    fn next_counter(&self) -> u64 {
        let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
        *counter += 1;
        *counter
    }
}

impl CodeSource for SequenceCodeSource {
    fn next_numeric_code(&self, length: usize) -> String {
        let queued = self
            .numeric
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        queued.unwrap_or_else(|| {
            let value = self.next_counter();
            let digits = format!("{value:0length$}");
            digits[digits.len() - length..].to_string()
        })
    }

    fn next_tracking_code(&self) -> TrackingCode {
        let mut value = self.next_counter();
        let base = TRACKING_CODE_ALPHABET.len() as u64;
        let mut indices: [usize; TRACKING_CODE_SUFFIX_LEN] = [0; TRACKING_CODE_SUFFIX_LEN];
        // last position holds the lowest digit
        for slot in indices.iter_mut().rev() {
            *slot = usize::try_from(value % base).unwrap_or_default();
            value /= base;
        }
        TrackingCode::from_alphabet_indices(indices)
    }
}
