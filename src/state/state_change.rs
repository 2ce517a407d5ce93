// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristic values pushed to and received from the host.
//!
//! # Change Types
//!
//! - [`StateChange::On`] - Output switched on or off
//! - [`StateChange::Active`] - Heater regulation mode
//! - [`StateChange::CurrentHeaterCoolerState`] - Derived heater status
//! - [`StateChange::TargetHeaterCoolerState`] - Fixed at heat
//! - [`StateChange::CurrentTemperature`] - Water temperature
//! - [`StateChange::HeatingThresholdTemperature`] - Heating setpoint
//!
//! # Examples
//!
//! ```
//! use klereo_lib::state::{DeviceState, OutputState, StateChange};
//!
//! let mut state = DeviceState::Output(OutputState::default());
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::On(true)));
//! assert!(!state.apply(&StateChange::On(true)));
//! ```

use std::fmt;

use crate::types::{HeaterCoolerState, TargetHeaterCoolerState};

/// A single characteristic value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateChange {
    /// Output energized.
    On(bool),
    /// Heater regulation enabled.
    Active(bool),
    /// Heater status derived from mode and output.
    CurrentHeaterCoolerState(HeaterCoolerState),
    /// Requested heater mode.
    TargetHeaterCoolerState(TargetHeaterCoolerState),
    /// Water temperature in degrees Celsius.
    CurrentTemperature(f64),
    /// Heating setpoint in degrees Celsius.
    HeatingThresholdTemperature(f64),
}

impl StateChange {
    /// Returns the host-facing characteristic name.
    #[must_use]
    pub fn characteristic(&self) -> &'static str {
        match self {
            Self::On(_) => "On",
            Self::Active(_) => "Active",
            Self::CurrentHeaterCoolerState(_) => "CurrentHeaterCoolerState",
            Self::TargetHeaterCoolerState(_) => "TargetHeaterCoolerState",
            Self::CurrentTemperature(_) => "CurrentTemperature",
            Self::HeatingThresholdTemperature(_) => "HeatingThresholdTemperature",
        }
    }

    /// Returns `true` if both values address the same characteristic.
    #[must_use]
    pub fn same_characteristic(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.characteristic();
        match self {
            Self::On(on) => write!(f, "{name}={}", if *on { "ON" } else { "OFF" }),
            Self::Active(active) => {
                write!(f, "{name}={}", if *active { "ACTIVE" } else { "INACTIVE" })
            }
            Self::CurrentHeaterCoolerState(state) => write!(f, "{name}={state}"),
            Self::TargetHeaterCoolerState(_) => write!(f, "{name}=HEAT"),
            Self::CurrentTemperature(t) | Self::HeatingThresholdTemperature(t) => {
                write!(f, "{name}={t}°C")
            }
        }
    }
}
