// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::device::DeviceId;
use crate::state::StateChange;

/// Events broadcast by the [`EventBus`](super::EventBus).
///
/// # Examples
///
/// ```
/// use klereo_lib::device::DeviceId;
/// use klereo_lib::event::DeviceEvent;
/// use klereo_lib::state::StateChange;
///
/// let device_id = DeviceId::for_output(12345, 0);
/// let event = DeviceEvent::characteristic_changed(device_id, StateChange::On(true));
/// assert!(event.is_characteristic_change());
/// assert_eq!(event.device_id(), device_id);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// A device was found during discovery.
    DeviceDiscovered {
        /// The ID of the device.
        device_id: DeviceId,
        /// Name shown to the user.
        display_name: String,
    },

    /// A characteristic value changed, after a poll or a rejected write.
    CharacteristicChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// The new value.
        change: StateChange,
    },
}

impl DeviceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::DeviceDiscovered { device_id, .. }
            | Self::CharacteristicChanged { device_id, .. } => *device_id,
        }
    }

    /// Returns `true` if this is a discovery event.
    #[must_use]
    pub fn is_discovery(&self) -> bool {
        matches!(self, Self::DeviceDiscovered { .. })
    }

    /// Returns `true` if this is a characteristic change.
    #[must_use]
    pub fn is_characteristic_change(&self) -> bool {
        matches!(self, Self::CharacteristicChanged { .. })
    }

    /// Returns the carried change, if any.
    #[must_use]
    pub fn change(&self) -> Option<&StateChange> {
        match self {
            Self::CharacteristicChanged { change, .. } => Some(change),
            Self::DeviceDiscovered { .. } => None,
        }
    }

    /// Creates a discovery event.
    #[must_use]
    pub fn device_discovered(device_id: DeviceId, display_name: impl Into<String>) -> Self {
        Self::DeviceDiscovered {
            device_id,
            display_name: display_name.into(),
        }
    }

    /// Creates a characteristic change event.
    #[must_use]
    pub fn characteristic_changed(device_id: DeviceId, change: StateChange) -> Self {
        Self::CharacteristicChanged { device_id, change }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let id = DeviceId::for_heater(1);
        let event = DeviceEvent::device_discovered(id, "Pool - Pool Heater");
        assert!(event.is_discovery());
        assert!(!event.is_characteristic_change());
        assert_eq!(event.change(), None);
        assert_eq!(event.device_id(), id);
    }
}
