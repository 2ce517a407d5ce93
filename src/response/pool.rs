// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pool listing and pool snapshot decoding.

use serde::Deserialize;
use serde_json::Value;

use crate::types::{OutputFunction, ProbeKind};

/// Summary of a pool, as returned by `GetIndex`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfo {
    /// Pool identifier used by every other endpoint.
    pub id_system: u64,
    /// User-chosen pool name.
    #[serde(default)]
    pub pool_nickname: String,
}

/// Full pool snapshot, as returned by `GetPoolDetails`.
///
/// Produced per poll and discarded after reconciliation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDetails {
    /// Pool identifier.
    pub id_system: u64,
    /// User-chosen pool name.
    #[serde(default)]
    pub pool_nickname: String,
    /// Sensor readings.
    #[serde(default)]
    pub probes: Vec<Probe>,
    /// Controllable outputs.
    #[serde(default)]
    pub outs: Vec<PoolOutput>,
    /// Regulation parameters.
    #[serde(default)]
    pub params: PoolParams,
    /// User labels for inputs and outputs.
    #[serde(rename = "IORename", default)]
    pub io_rename: Vec<IoRename>,
}

impl PoolDetails {
    /// Finds an output by index.
    #[must_use]
    pub fn output(&self, index: u32) -> Option<&PoolOutput> {
        self.outs.iter().find(|o| o.index == index)
    }

    /// Finds a probe by index.
    #[must_use]
    pub fn probe(&self, index: u32) -> Option<&Probe> {
        self.probes.iter().find(|p| p.index == index)
    }

    /// Finds the first probe of the given kind.
    #[must_use]
    pub fn probe_of_kind(&self, kind: ProbeKind) -> Option<&Probe> {
        self.probes.iter().find(|p| p.kind() == Some(kind))
    }

    /// Returns the user label of an output, if one was set.
    #[must_use]
    pub fn output_label(&self, index: u32) -> Option<&str> {
        self.io_rename
            .iter()
            .find(|r| r.io_type == IoRename::OUTPUT && r.io_index == index)
            .map(|r| r.name.as_str())
    }
}

/// A controllable output (light, filter pump, heater, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolOutput {
    /// Output index within the pool.
    pub index: u32,
    /// Output type.
    #[serde(rename = "type", default)]
    pub output_type: i64,
    /// Control mode, 0 when the output is unused.
    #[serde(default)]
    pub mode: i64,
    /// 1 when energized, 0 otherwise.
    #[serde(default)]
    pub status: i64,
    /// Accumulated run time.
    #[serde(default)]
    pub total_time: i64,
    /// Function tag.
    #[serde(default)]
    pub map: i64,
}

impl PoolOutput {
    /// Returns `true` if the output is currently energized.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.status == 1
    }

    /// Unused outputs report mode, status and run time all zero.
    #[must_use]
    pub fn is_unconfigured(&self) -> bool {
        self.mode == 0 && self.status == 0 && self.total_time == 0
    }

    /// Returns the decoded function tag.
    #[must_use]
    pub fn function(&self) -> OutputFunction {
        OutputFunction::from_map(self.map)
    }
}

/// A sensor reading.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    /// Probe index within the pool.
    pub index: u32,
    /// Raw probe type.
    #[serde(rename = "type", default)]
    pub probe_type: i64,
    /// Filtered reading.
    #[serde(default)]
    pub filtered_value: Option<f64>,
}

impl Probe {
    /// Returns the decoded probe kind, if known.
    #[must_use]
    pub fn kind(&self) -> Option<ProbeKind> {
        ProbeKind::from_code(self.probe_type)
    }
}

/// A user label for an input or output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoRename {
    /// 1 for outputs.
    pub io_type: i64,
    /// Index of the labelled entry.
    pub io_index: u32,
    /// The label.
    #[serde(default)]
    pub name: String,
}

impl IoRename {
    /// `io_type` value for outputs.
    pub const OUTPUT: i64 = 1;
}

/// Typed view of the loosely typed `params` bag.
///
/// Each field is `None` when the key is missing or not numeric, never zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct PoolParams {
    /// `HeaterMode`: 1 when heating regulation is enabled.
    pub heater_mode: Option<f64>,
    /// `ConsigneEau`: water temperature setpoint.
    pub water_setpoint: Option<f64>,
    /// `EauMin`: lowest accepted setpoint.
    pub water_min: Option<f64>,
    /// `EauMax`: highest accepted setpoint.
    pub water_max: Option<f64>,
}

impl PoolParams {
    /// Parameter id of the heating mode flag.
    pub const HEATER_MODE: &'static str = "HeaterMode";
    /// Parameter id of the water setpoint.
    pub const WATER_SETPOINT: &'static str = "ConsigneEau";
    /// Parameter id of the lowest setpoint.
    pub const WATER_MIN: &'static str = "EauMin";
    /// Parameter id of the highest setpoint.
    pub const WATER_MAX: &'static str = "EauMax";

    /// Returns whether heating regulation is enabled, if reported.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn heater_mode_active(&self) -> Option<bool> {
        self.heater_mode.map(|mode| mode == 1.0)
    }
}

impl From<Value> for PoolParams {
    fn from(value: Value) -> Self {
        // An empty bag may arrive as `[]`
        let Value::Object(map) = value else {
            return Self::default();
        };
        let get = |key: &str| map.get(key).and_then(lenient_number);
        Self {
            heater_mode: get(Self::HEATER_MODE),
            water_setpoint: get(Self::WATER_SETPOINT),
            water_min: get(Self::WATER_MIN),
            water_max: get(Self::WATER_MAX),
        }
    }
}

/// Reads a number that may have been serialized as a string or a boolean.
fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
