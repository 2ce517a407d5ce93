// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heater-related types.

use std::fmt;

use crate::error::ValueError;

/// Current heater/cooler status shown to the host.
///
/// Derived from two independent signals: the `HeaterMode` parameter and
/// whether the heating output is energized.
///
/// # Examples
///
/// ```
/// use klereo_lib::types::HeaterCoolerState;
///
/// assert_eq!(HeaterCoolerState::derive(false, true), HeaterCoolerState::Inactive);
/// assert_eq!(HeaterCoolerState::derive(true, true), HeaterCoolerState::Heating);
/// assert_eq!(HeaterCoolerState::derive(true, false), HeaterCoolerState::Idle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaterCoolerState {
    /// Heating regulation is disabled.
    #[default]
    Inactive,
    /// Regulation enabled, heater not firing.
    Idle,
    /// Regulation enabled, heater firing.
    Heating,
}

impl HeaterCoolerState {
    /// Combines the mode flag and the output status.
    #[must_use]
    pub const fn derive(mode_active: bool, output_energized: bool) -> Self {
        match (mode_active, output_energized) {
            (false, _) => Self::Inactive,
            (true, true) => Self::Heating,
            (true, false) => Self::Idle,
        }
    }

    /// Returns the numeric value used by accessory hosts (0, 1, 2).
    #[must_use]
    pub const fn as_num(self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Idle => 1,
            Self::Heating => 2,
        }
    }
}

impl fmt::Display for HeaterCoolerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inactive => "INACTIVE",
            Self::Idle => "IDLE",
            Self::Heating => "HEATING",
        };
        f.write_str(s)
    }
}

/// Requested heater/cooler mode. The pool heater only heats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetHeaterCoolerState {
    /// Heat.
    #[default]
    Heat,
}

impl TargetHeaterCoolerState {
    /// Returns the numeric value used by accessory hosts.
    #[must_use]
    pub const fn as_num(self) -> u8 {
        match self {
            Self::Heat => 1,
        }
    }
}

/// Accepted bounds for the water temperature setpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointRange {
    min: f64,
    max: f64,
}

impl SetpointRange {
    /// Lower bound used when the pool does not report `EauMin`.
    pub const DEFAULT_MIN: f64 = 0.0;
    /// Upper bound used when the pool does not report `EauMax`.
    pub const DEFAULT_MAX: f64 = 40.0;
    /// Granularity offered to the host.
    pub const STEP: f64 = 0.5;

    /// Creates a range, swapping the bounds if they are inverted.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Builds the range from optional pool parameters.
    #[must_use]
    pub fn from_params(min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(
            min.unwrap_or(Self::DEFAULT_MIN),
            max.unwrap_or(Self::DEFAULT_MAX),
        )
    }

    /// Returns the lowest accepted setpoint.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the highest accepted setpoint.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Checks that `value` lies within the range.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the value is not finite or out of bounds.
    pub fn validate(&self, value: f64) -> Result<f64, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NonFiniteSetpoint);
        }
        if value < self.min || value > self.max {
            return Err(ValueError::SetpointOutOfRange {
                min: self.min,
                max: self.max,
                actual: value,
            });
        }
        Ok(value)
    }
}

impl Default for SetpointRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_off_is_inactive_regardless_of_output() {
        assert_eq!(
            HeaterCoolerState::derive(false, false),
            HeaterCoolerState::Inactive
        );
        assert_eq!(
            HeaterCoolerState::derive(false, true),
            HeaterCoolerState::Inactive
        );
    }

    #[test]
    fn mode_on_follows_output() {
        assert_eq!(
            HeaterCoolerState::derive(true, true),
            HeaterCoolerState::Heating
        );
        assert_eq!(HeaterCoolerState::derive(true, false), HeaterCoolerState::Idle);
    }

    #[test]
    fn numeric_values() {
        assert_eq!(HeaterCoolerState::Inactive.as_num(), 0);
        assert_eq!(HeaterCoolerState::Idle.as_num(), 1);
        assert_eq!(HeaterCoolerState::Heating.as_num(), 2);
        assert_eq!(TargetHeaterCoolerState::Heat.as_num(), 1);
    }

    #[test]
    fn setpoint_range_defaults() {
        let range = SetpointRange::from_params(None, Some(35.0));
        assert!((range.min() - 0.0).abs() < f64::EPSILON);
        assert!((range.max() - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn setpoint_range_validation() {
        let range = SetpointRange::default();
        assert!(range.validate(28.5).is_ok());
        assert!(range.validate(40.0).is_ok());
        assert!(matches!(
            range.validate(41.0),
            Err(ValueError::SetpointOutOfRange { .. })
        ));
        assert_eq!(range.validate(f64::NAN), Err(ValueError::NonFiniteSetpoint));
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let range = SetpointRange::new(30.0, 10.0);
        assert!(range.validate(20.0).is_ok());
    }
}
