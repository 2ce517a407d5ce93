// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timing of the per-device engine.

use std::time::Duration;

/// Timing options of a [`DeviceStateSync`](super::DeviceStateSync).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use klereo_lib::sync::SyncOptions;
///
/// let options = SyncOptions::new().with_polling_interval(Duration::from_secs(60));
/// assert_eq!(options.polling_interval(), Duration::from_secs(60));
/// assert_eq!(options.correction_delay(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    polling_interval: Duration,
    correction_delay: Duration,
}

impl SyncOptions {
    /// Default time between two polls.
    pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(30);
    /// Default delay before a rejected write is corrected on the host.
    pub const DEFAULT_CORRECTION_DELAY: Duration = Duration::from_millis(100);

    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            polling_interval: Self::DEFAULT_POLLING_INTERVAL,
            correction_delay: Self::DEFAULT_CORRECTION_DELAY,
        }
    }

    /// Sets the time between two polls.
    #[must_use]
    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    /// Sets the delay before a rejected write is corrected on the host.
    #[must_use]
    pub fn with_correction_delay(mut self, delay: Duration) -> Self {
        self.correction_delay = delay;
        self
    }

    /// Returns the time between two polls.
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }

    /// Returns the correction delay.
    #[must_use]
    pub fn correction_delay(&self) -> Duration {
        self.correction_delay
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::new()
    }
}
