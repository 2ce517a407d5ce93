// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the snapshot decoder and the device engine.
//!
//! - [`HeaterCoolerState`] - Derived INACTIVE/IDLE/HEATING status
//! - [`TargetHeaterCoolerState`] - Requested heater mode (HEAT only)
//! - [`ProbeKind`] - Decoded probe `type` codes
//! - [`OutputFunction`] - Decoded output `map` tags
//! - [`SetpointRange`] - Accepted water setpoint bounds

mod heater;
mod pool;

pub use heater::{HeaterCoolerState, SetpointRange, TargetHeaterCoolerState};
pub use pool::{OutputFunction, ProbeKind};
