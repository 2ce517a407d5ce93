// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The automation host's side of the bridge.

use crate::device::{Device, DeviceId};
use crate::state::StateChange;

/// Receives pushes from the bridge.
///
/// The host pulls values through
/// [`DeviceStateSync::get`](crate::sync::DeviceStateSync::get) and writes
/// through [`DeviceStateSync::set`](crate::sync::DeviceStateSync::set);
/// this trait covers the opposite direction. Implementations must not block.
///
/// [`EventBus`](crate::event::EventBus) is a ready-made implementation that
/// rebroadcasts every push to its subscribers.
pub trait HostAdapter: Send + Sync {
    /// A characteristic of `device` now has the value carried by `change`.
    fn update_characteristic(&self, device: DeviceId, change: StateChange);

    /// A device was found during discovery.
    fn device_discovered(&self, device: &Device) {
        let _ = device;
    }
}
