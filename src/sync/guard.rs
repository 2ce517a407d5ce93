// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device write/poll exclusion.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Whether a device has a write in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteState {
    /// No write in flight; polls may reconcile.
    #[default]
    Idle,
    /// A write is in flight; polls are skipped and new writes dropped.
    Writing,
}

impl fmt::Display for WriteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Writing => f.write_str("writing"),
        }
    }
}

/// Two-state guard: at most one write per device, and no reconciliation
/// while it runs.
///
/// Acquisition is a single compare-and-swap, so two concurrent writers can
/// never both succeed. Every acquisition also bumps a generation counter, so
/// a reader can tell whether any write started between two points in time,
/// even one that has already finished.
///
/// # Examples
///
/// ```
/// use klereo_lib::sync::{WriteGuard, WriteState};
///
/// let guard = WriteGuard::new();
/// let permit = guard.try_acquire().unwrap();
/// assert_eq!(guard.state(), WriteState::Writing);
/// assert!(guard.try_acquire().is_none());
///
/// drop(permit);
/// assert_eq!(guard.state(), WriteState::Idle);
/// ```
#[derive(Debug, Default)]
pub struct WriteGuard {
    writing: AtomicBool,
    generation: AtomicU64,
}

impl WriteGuard {
    /// Creates an idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to [`WriteState::Writing`] unless a write is already in flight.
    ///
    /// The guard returns to idle when the permit is dropped, whatever the
    /// outcome of the write.
    #[must_use]
    pub fn try_acquire(&self) -> Option<WritePermit<'_>> {
        self.writing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.generation.fetch_add(1, Ordering::AcqRel);
        Some(WritePermit { guard: self })
    }

    /// Returns the number of writes started so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns `true` if a write is in flight or one started after
    /// `generation` was read.
    #[must_use]
    pub fn written_since(&self, generation: u64) -> bool {
        self.is_writing() || self.generation() != generation
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> WriteState {
        if self.is_writing() {
            WriteState::Writing
        } else {
            WriteState::Idle
        }
    }

    /// Returns `true` while a write is in flight.
    #[must_use]
    pub fn is_writing(&self) -> bool {
        self.writing.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the device's single write slot.
#[derive(Debug)]
pub struct WritePermit<'a> {
    guard: &'a WriteGuard,
}

impl Drop for WritePermit<'_> {
    fn drop(&mut self) {
        self.guard.writing.store(false, Ordering::Release);
    }
}
