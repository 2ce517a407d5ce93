// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached device state.

use crate::types::{HeaterCoolerState, TargetHeaterCoolerState};

use super::StateChange;

/// Cached state of a switch output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputState {
    /// Output energized.
    pub on: bool,
}

impl OutputState {
    /// Returns every characteristic value of the output.
    #[must_use]
    pub fn characteristics(&self) -> Vec<StateChange> {
        vec![StateChange::On(self.on)]
    }
}

/// Cached state of the pool heater.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaterState {
    /// Water temperature.
    pub current_temperature: f64,
    /// Heating setpoint.
    pub target_temperature: f64,
    /// `HeaterMode` parameter is on.
    pub heater_mode_active: bool,
    /// Heating output is energized.
    pub is_heating: bool,
}

impl HeaterState {
    /// Temperature reported before the first poll.
    pub const DEFAULT_CURRENT_TEMPERATURE: f64 = 0.0;
    /// Setpoint reported before the first poll.
    pub const DEFAULT_TARGET_TEMPERATURE: f64 = 20.0;

    /// Returns the derived heater/cooler state.
    #[must_use]
    pub fn heater_cooler_state(&self) -> HeaterCoolerState {
        HeaterCoolerState::derive(self.heater_mode_active, self.is_heating)
    }

    /// Returns every characteristic value of the heater.
    #[must_use]
    pub fn characteristics(&self) -> Vec<StateChange> {
        vec![
            StateChange::Active(self.heater_mode_active),
            StateChange::CurrentHeaterCoolerState(self.heater_cooler_state()),
            StateChange::TargetHeaterCoolerState(TargetHeaterCoolerState::Heat),
            StateChange::CurrentTemperature(self.current_temperature),
            StateChange::HeatingThresholdTemperature(self.target_temperature),
        ]
    }

    /// Lists the characteristics whose value differs from `previous`.
    ///
    /// [`StateChange::CurrentHeaterCoolerState`] is listed whenever the derived
    /// value changes, whichever input moved.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn changes_since(&self, previous: &Self) -> Vec<StateChange> {
        let mut changes = Vec::new();
        if self.current_temperature != previous.current_temperature {
            changes.push(StateChange::CurrentTemperature(self.current_temperature));
        }
        if self.heater_mode_active != previous.heater_mode_active {
            changes.push(StateChange::Active(self.heater_mode_active));
        }
        if self.heater_cooler_state() != previous.heater_cooler_state() {
            changes.push(StateChange::CurrentHeaterCoolerState(
                self.heater_cooler_state(),
            ));
        }
        if self.target_temperature != previous.target_temperature {
            changes.push(StateChange::HeatingThresholdTemperature(
                self.target_temperature,
            ));
        }
        changes
    }
}

impl Default for HeaterState {
    fn default() -> Self {
        Self {
            current_temperature: Self::DEFAULT_CURRENT_TEMPERATURE,
            target_temperature: Self::DEFAULT_TARGET_TEMPERATURE,
            heater_mode_active: false,
            is_heating: false,
        }
    }
}

/// Cached state of any device.
///
/// # Examples
///
/// ```
/// use klereo_lib::state::{DeviceState, HeaterState, StateChange};
///
/// let mut state = DeviceState::Heater(HeaterState::default());
/// assert!(state.apply(&StateChange::HeatingThresholdTemperature(28.0)));
/// assert!(!state.apply(&StateChange::On(true)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceState {
    /// Switch output.
    Output(OutputState),
    /// Pool heater.
    Heater(HeaterState),
}

impl DeviceState {
    /// Returns the output state, if this is one.
    #[must_use]
    pub fn as_output(&self) -> Option<&OutputState> {
        match self {
            Self::Output(s) => Some(s),
            Self::Heater(_) => None,
        }
    }

    /// Returns the heater state, if this is one.
    #[must_use]
    pub fn as_heater(&self) -> Option<&HeaterState> {
        match self {
            Self::Heater(s) => Some(s),
            Self::Output(_) => None,
        }
    }

    /// Returns every characteristic value.
    #[must_use]
    pub fn characteristics(&self) -> Vec<StateChange> {
        match self {
            Self::Output(s) => s.characteristics(),
            Self::Heater(s) => s.characteristics(),
        }
    }

    /// Returns the current value of the characteristic `change` addresses.
    #[must_use]
    pub fn value_of(&self, change: &StateChange) -> Option<StateChange> {
        self.characteristics()
            .into_iter()
            .find(|c| c.same_characteristic(change))
    }

    /// Applies a change and returns whether the state actually changed.
    ///
    /// Changes addressing a characteristic the device does not store
    /// (derived, fixed, or belonging to the other variant) return `false`.
    #[allow(clippy::float_cmp)]
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match (self, change) {
            (Self::Output(state), StateChange::On(on)) => {
                let changed = state.on != *on;
                state.on = *on;
                changed
            }
            (Self::Heater(state), StateChange::Active(active)) => {
                let changed = state.heater_mode_active != *active;
                state.heater_mode_active = *active;
                changed
            }
            (Self::Heater(state), StateChange::CurrentTemperature(t)) => {
                let changed = state.current_temperature != *t;
                state.current_temperature = *t;
                changed
            }
            (Self::Heater(state), StateChange::HeatingThresholdTemperature(t)) => {
                let changed = state.target_temperature != *t;
                state.target_temperature = *t;
                changed
            }
            _ => false,
        }
    }
}
