// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state types.
//!
//! [`DeviceState`] is the cached value set of one device, owned by its
//! [`DeviceStateSync`](crate::sync::DeviceStateSync). It changes only through
//! reconciliation against a poll or after a confirmed write. [`StateChange`]
//! is one characteristic value, the unit exchanged with the host.

mod device_state;
mod state_change;

pub use device_state::{DeviceState, HeaterState, OutputState};
pub use state_change::StateChange;
