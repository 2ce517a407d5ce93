// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-level coordination.
//!
//! [`Bridge`] is the entry point for a host: it validates the
//! [`BridgeConfig`], discovers the pools' devices, runs one
//! [`DeviceStateSync`](crate::sync::DeviceStateSync) per device, keeps the
//! session fresh, and stops every timer on [`Bridge::shutdown`].
//!
//! # Lifecycle
//!
//! 1. [`Bridge::new`] validates credentials; no I/O.
//! 2. [`Bridge::start`] starts the 55 minute session refresh, then logs in,
//!    lists pools and registers devices. Each device polls immediately,
//!    then every polling interval.
//! 3. [`Bridge::shutdown`] cancels the refresh timer and all poll timers.

mod bridge;
mod bridge_config;

pub use bridge::Bridge;
pub use bridge_config::BridgeConfig;
