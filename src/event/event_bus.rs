// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting device events.

use tokio::sync::broadcast;

use super::DeviceEvent;
use crate::device::{Device, DeviceId};
use crate::host::HostAdapter;
use crate::state::StateChange;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A [`HostAdapter`] that rebroadcasts pushes to any number of subscribers.
///
/// # Capacity
///
/// The bus has a fixed capacity (default 256). A subscriber that falls
/// behind loses the oldest events and receives `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use klereo_lib::device::DeviceId;
/// use klereo_lib::event::EventBus;
/// use klereo_lib::host::HostAdapter;
/// use klereo_lib::state::StateChange;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.update_characteristic(DeviceId::for_output(1, 0), StateChange::On(true));
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus holding at most `capacity` pending events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: DeviceEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl HostAdapter for EventBus {
    fn update_characteristic(&self, device: DeviceId, change: StateChange) {
        self.publish(DeviceEvent::characteristic_changed(device, change));
    }

    fn device_discovered(&self, device: &Device) {
        self.publish(DeviceEvent::device_discovered(
            device.id(),
            device.display_name(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::OutputDevice;

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscribe_and_drop_track_count() {
        let bus = EventBus::new();
        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn host_pushes_are_broadcast() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let id = DeviceId::for_output(1, 0);
        bus.update_characteristic(id, StateChange::On(true));

        let expected = DeviceEvent::characteristic_changed(id, StateChange::On(true));
        assert_eq!(rx1.recv().await.unwrap(), expected);
        assert_eq!(rx2.recv().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn discovery_is_broadcast() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let device: Device = OutputDevice::new(1, "Pool", 2, "Filter").into();
        bus.device_discovered(&device);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            DeviceEvent::device_discovered(device.id(), "Pool - Filter")
        );
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.update_characteristic(DeviceId::for_heater(1), StateChange::Active(true));
    }

    #[tokio::test]
    async fn clone_shares_same_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();
        let mut rx = bus1.subscribe();

        bus2.publish(DeviceEvent::characteristic_changed(
            DeviceId::for_heater(3),
            StateChange::Active(false),
        ));
        assert!(rx.recv().await.is_ok());
    }
}
