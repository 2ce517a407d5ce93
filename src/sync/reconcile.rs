// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Comparison of cached state against a fresh snapshot.
//!
//! These functions compute the next cached state and the list of values to
//! push to the host. They never touch the network or the cache. Fields the
//! snapshot does not report keep their cached value.

use crate::device::{Device, HeaterDevice, OutputDevice};
use crate::response::{PoolDetails, Probe};
use crate::state::{DeviceState, HeaterState, OutputState, StateChange};
use crate::types::ProbeKind;

/// Reconciles any device.
///
/// A state of the wrong variant for `device` is returned unchanged.
#[must_use]
pub fn reconcile(
    device: &Device,
    cached: &DeviceState,
    details: &PoolDetails,
) -> (DeviceState, Vec<StateChange>) {
    match (device, cached) {
        (Device::Output(device), DeviceState::Output(state)) => {
            let (next, changes) = reconcile_output(device, *state, details);
            (DeviceState::Output(next), changes)
        }
        (Device::Heater(device), DeviceState::Heater(state)) => {
            let (next, changes) = reconcile_heater(device, state, details);
            (DeviceState::Heater(next), changes)
        }
        _ => (*cached, Vec::new()),
    }
}

/// Reconciles a switch output against its entry in the snapshot.
#[must_use]
pub fn reconcile_output(
    device: &OutputDevice,
    cached: OutputState,
    details: &PoolDetails,
) -> (OutputState, Vec<StateChange>) {
    let Some(output) = details.output(device.output_index) else {
        tracing::warn!(
            pool_id = device.pool_id,
            index = device.output_index,
            "Output not found in pool"
        );
        return (cached, Vec::new());
    };

    let next = OutputState { on: output.is_on() };
    if next == cached {
        (cached, Vec::new())
    } else {
        (next, vec![StateChange::On(next.on)])
    }
}

/// Reconciles the heater against the water probe, the heating output and
/// the parameter bag.
#[must_use]
pub fn reconcile_heater(
    device: &HeaterDevice,
    cached: &HeaterState,
    details: &PoolDetails,
) -> (HeaterState, Vec<StateChange>) {
    let mut next = *cached;

    match water_probe(device, details) {
        Some(probe) => {
            if let Some(value) = probe.filtered_value {
                next.current_temperature = value;
            }
        }
        None if device.water_probe_index.is_some() => {
            tracing::warn!(pool_id = device.pool_id, "Water temperature probe not found in pool");
        }
        None => {}
    }

    if let Some(active) = details.params.heater_mode_active() {
        next.heater_mode_active = active;
    }

    match details.output(device.heating_output_index) {
        Some(output) => next.is_heating = output.is_on(),
        None => tracing::warn!(
            pool_id = device.pool_id,
            index = device.heating_output_index,
            "Heating output not found in pool"
        ),
    }

    if let Some(setpoint) = details.params.water_setpoint {
        next.target_temperature = setpoint;
    }

    let changes = next.changes_since(cached);
    (next, changes)
}

fn water_probe<'a>(device: &HeaterDevice, details: &'a PoolDetails) -> Option<&'a Probe> {
    match device.water_probe_index {
        Some(index) => details.probe(index),
        None => details.probe_of_kind(ProbeKind::WaterTemperature),
    }
}
