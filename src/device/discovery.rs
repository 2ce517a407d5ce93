// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification of a pool snapshot into devices.

use super::{DEFAULT_HEATER_NAME, Device, HeaterDevice, OutputDevice};
use crate::response::PoolDetails;
use crate::types::{ProbeKind, SetpointRange};

/// Turns a pool snapshot into the devices to expose.
///
/// - Outputs with mode, status and run time all zero are skipped.
/// - The first output tagged as heating becomes a [`HeaterDevice`] paired with
///   the water temperature probe, if any. Heating outputs never become switches.
/// - Every other output becomes an [`OutputDevice`], named from the rename
///   list or `Output <index>`.
///
/// # Examples
///
/// ```
/// use klereo_lib::device::{Device, discover_devices};
/// use klereo_lib::response::PoolDetails;
///
/// let details: PoolDetails = serde_json::from_value(serde_json::json!({
///     "idSystem": 1,
///     "poolNickname": "Pool",
///     "outs": [
///         {"index": 0, "mode": 1, "status": 1, "totalTime": 10, "map": 0},
///         {"index": 1, "mode": 0, "status": 0, "totalTime": 0, "map": 0}
///     ]
/// }))
/// .unwrap();
///
/// let devices = discover_devices(&details);
/// assert_eq!(devices.len(), 1);
/// assert_eq!(devices[0].display_name(), "Pool - Output 0");
/// ```
#[must_use]
pub fn discover_devices(details: &PoolDetails) -> Vec<Device> {
    let pool_id = details.id_system;
    let pool_name = details.pool_nickname.as_str();
    let mut devices = Vec::new();
    let mut heater: Option<HeaterDevice> = None;

    for output in &details.outs {
        if output.is_unconfigured() {
            tracing::debug!(pool_id, index = output.index, "Skipping unconfigured output");
            continue;
        }

        let label = details.output_label(output.index);

        if output.function().is_heating() {
            if heater.is_some() {
                tracing::debug!(pool_id, index = output.index, "Ignoring extra heating output");
                continue;
            }
            let water_probe = details.probe_of_kind(ProbeKind::WaterTemperature);
            if water_probe.is_none() {
                tracing::warn!(pool_id, "No water temperature probe for heater");
            }
            let range = SetpointRange::from_params(details.params.water_min, details.params.water_max);
            let name = label.unwrap_or(DEFAULT_HEATER_NAME);

            tracing::debug!(pool_id, index = output.index, name, "Registering heater");
            heater = Some(HeaterDevice::new(
                pool_id,
                pool_name,
                output.index,
                water_probe.map(|p| p.index),
                range,
                name,
            ));
            continue;
        }

        let name = label.map_or_else(|| format!("Output {}", output.index), str::to_string);
        tracing::debug!(pool_id, index = output.index, name = %name, "Registering output");
        devices.push(OutputDevice::new(pool_id, pool_name, output.index, name).into());
    }

    devices.extend(heater.map(Device::Heater));
    devices
}
