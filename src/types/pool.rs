// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Probe and output classification codes.

/// Kind of a probe, decoded from its numeric `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    /// Air temperature.
    AirTemperature,
    /// pH.
    Ph,
    /// Redox potential.
    Redox,
    /// Water temperature.
    WaterTemperature,
    /// Filter pressure.
    Pressure,
    /// Salt concentration.
    Salt,
}

impl ProbeKind {
    /// Decodes a raw probe type. Unknown codes yield `None`.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::AirTemperature),
            3 => Some(Self::Ph),
            4 => Some(Self::Redox),
            5 => Some(Self::WaterTemperature),
            6 => Some(Self::Pressure),
            12 => Some(Self::Salt),
            _ => None,
        }
    }

    /// Returns the raw probe type.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::AirTemperature => 1,
            Self::Ph => 3,
            Self::Redox => 4,
            Self::WaterTemperature => 5,
            Self::Pressure => 6,
            Self::Salt => 12,
        }
    }
}

/// Function of an output, decoded from its `map` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFunction {
    /// Lights.
    Lights,
    /// Filtration pump.
    Filter,
    /// pH-minus dosing pump.
    PhMinus,
    /// Disinfection.
    Chlorine,
    /// Heating actuator.
    Heating,
    /// Cleaning robot.
    Robot,
    /// Any other tag, kept verbatim.
    Auxiliary(i64),
}

impl OutputFunction {
    /// Decodes a `map` tag.
    #[must_use]
    pub const fn from_map(map: i64) -> Self {
        match map {
            0 => Self::Lights,
            1 => Self::Filter,
            2 => Self::PhMinus,
            3 => Self::Chlorine,
            4 => Self::Heating,
            5 => Self::Robot,
            other => Self::Auxiliary(other),
        }
    }

    /// Returns `true` for the heating actuator.
    #[must_use]
    pub const fn is_heating(self) -> bool {
        matches!(self, Self::Heating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_codes_round_trip() {
        for kind in [
            ProbeKind::AirTemperature,
            ProbeKind::Ph,
            ProbeKind::Redox,
            ProbeKind::WaterTemperature,
            ProbeKind::Pressure,
            ProbeKind::Salt,
        ] {
            assert_eq!(ProbeKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ProbeKind::from_code(99), None);
    }

    #[test]
    fn heating_map_tag() {
        assert!(OutputFunction::from_map(4).is_heating());
        assert!(!OutputFunction::from_map(0).is_heating());
        assert_eq!(OutputFunction::from_map(9), OutputFunction::Auxiliary(9));
    }
}
