// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Devices exposed to the host.
//!
//! A [`Device`] is an immutable identity handle created once at discovery
//! time. Its changing values live in [`DeviceState`], owned by the device's
//! [`DeviceStateSync`](crate::sync::DeviceStateSync).
//!
//! - [`OutputDevice`]: a generic output exposed as an on/off switch
//! - [`HeaterDevice`]: the heating output paired with the water probe

mod device_id;
mod discovery;

pub use device_id::DeviceId;
pub use discovery::discover_devices;

use std::fmt;

use crate::state::{DeviceState, HeaterState, OutputState};
use crate::types::SetpointRange;

/// Name given to a heater without a user label.
pub const DEFAULT_HEATER_NAME: &str = "Pool Heater";

/// A discovered device.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    /// On/off output.
    Output(OutputDevice),
    /// Pool heater.
    Heater(HeaterDevice),
}

impl Device {
    /// Returns the stable identifier.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        match self {
            Self::Output(d) => d.id,
            Self::Heater(d) => d.id,
        }
    }

    /// Returns the pool the device belongs to.
    #[must_use]
    pub fn pool_id(&self) -> u64 {
        match self {
            Self::Output(d) => d.pool_id,
            Self::Heater(d) => d.pool_id,
        }
    }

    /// Returns the name shown to the user, `<pool> - <output>`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Output(d) => &d.display_name,
            Self::Heater(d) => &d.display_name,
        }
    }

    /// Returns the cached state a freshly created device starts from.
    #[must_use]
    pub fn initial_state(&self) -> DeviceState {
        match self {
            Self::Output(_) => DeviceState::Output(OutputState::default()),
            Self::Heater(_) => DeviceState::Heater(HeaterState::default()),
        }
    }

    /// Returns the output device, if this is one.
    #[must_use]
    pub fn as_output(&self) -> Option<&OutputDevice> {
        match self {
            Self::Output(d) => Some(d),
            Self::Heater(_) => None,
        }
    }

    /// Returns the heater device, if this is one.
    #[must_use]
    pub fn as_heater(&self) -> Option<&HeaterDevice> {
        match self {
            Self::Heater(d) => Some(d),
            Self::Output(_) => None,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<OutputDevice> for Device {
    fn from(device: OutputDevice) -> Self {
        Self::Output(device)
    }
}

impl From<HeaterDevice> for Device {
    fn from(device: HeaterDevice) -> Self {
        Self::Heater(device)
    }
}

/// A pool output exposed as a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDevice {
    /// Stable identifier.
    pub id: DeviceId,
    /// Owning pool.
    pub pool_id: u64,
    /// Output index within the pool.
    pub output_index: u32,
    /// Output label, from the rename list or `Output <index>`.
    pub name: String,
    /// `<pool> - <name>`.
    pub display_name: String,
}

impl OutputDevice {
    /// Creates an output device.
    #[must_use]
    pub fn new(pool_id: u64, pool_name: &str, output_index: u32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: DeviceId::for_output(pool_id, output_index),
            pool_id,
            output_index,
            display_name: format!("{pool_name} - {name}"),
            name,
        }
    }
}

/// The pool heater.
///
/// Reports the water temperature and the heating setpoint, and derives its
/// heater/cooler state from the heater mode parameter and the heating
/// output status.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaterDevice {
    /// Stable identifier.
    pub id: DeviceId,
    /// Owning pool.
    pub pool_id: u64,
    /// Index of the output tagged as the heating function.
    pub heating_output_index: u32,
    /// Index of the water temperature probe, if the pool has one.
    pub water_probe_index: Option<u32>,
    /// Accepted setpoints.
    pub setpoint_range: SetpointRange,
    /// Heater label.
    pub name: String,
    /// `<pool> - <name>`.
    pub display_name: String,
}

impl HeaterDevice {
    /// Creates a heater device.
    #[must_use]
    pub fn new(
        pool_id: u64,
        pool_name: &str,
        heating_output_index: u32,
        water_probe_index: Option<u32>,
        setpoint_range: SetpointRange,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: DeviceId::for_heater(pool_id),
            pool_id,
            heating_output_index,
            water_probe_index,
            setpoint_range,
            display_name: format!("{pool_name} - {name}"),
            name,
        }
    }

    /// Lowest accepted setpoint.
    #[must_use]
    pub fn min_setpoint(&self) -> f64 {
        self.setpoint_range.min()
    }

    /// Highest accepted setpoint.
    #[must_use]
    pub fn max_setpoint(&self) -> f64 {
        self.setpoint_range.max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_display_name() {
        let device = OutputDevice::new(12345, "La Faub", 0, "Lights");
        assert_eq!(device.display_name, "La Faub - Lights");
        assert_eq!(device.id, DeviceId::for_output(12345, 0));
    }

    #[test]
    fn accessors_dispatch_on_variant() {
        let heater: Device = HeaterDevice::new(
            9,
            "Pool",
            4,
            Some(16),
            SetpointRange::default(),
            DEFAULT_HEATER_NAME,
        )
        .into();

        assert_eq!(heater.pool_id(), 9);
        assert_eq!(heater.id(), DeviceId::for_heater(9));
        assert_eq!(heater.display_name(), "Pool - Pool Heater");
        assert!(heater.as_output().is_none());
        assert!(matches!(heater.initial_state(), DeviceState::Heater(_)));
    }

    #[test]
    fn heater_bounds() {
        let heater = HeaterDevice::new(
            9,
            "Pool",
            4,
            None,
            SetpointRange::new(10.0, 35.0),
            "Heat pump",
        );
        assert!((heater.min_setpoint() - 10.0).abs() < f64::EPSILON);
        assert!((heater.max_setpoint() - 35.0).abs() < f64::EPSILON);
    }
}
