// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast host adapter.
//!
//! [`EventBus`] implements [`HostAdapter`](crate::host::HostAdapter) over a
//! tokio broadcast channel, for hosts that prefer consuming a stream of
//! [`DeviceEvent`]s to implementing the trait themselves.
//!
//! # Examples
//!
//! ```
//! use klereo_lib::device::DeviceId;
//! use klereo_lib::event::{DeviceEvent, EventBus};
//! use klereo_lib::state::StateChange;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::characteristic_changed(
//!     DeviceId::for_output(12345, 0),
//!     StateChange::On(true),
//! ));
//! ```

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub use event_bus::EventBus;
