// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device synchronization engine.
//!
//! One [`DeviceStateSync`] exists per exposed device. It owns the device's
//! cached [`DeviceState`], answers host reads from the cache, turns host
//! writes into remote commands, and periodically reconciles the cache
//! against a fresh pool snapshot.
//!
//! # Write/poll exclusion
//!
//! Each device has a [`WriteGuard`]:
//!
//! | Event | Guard idle | Guard writing |
//! |-------|------------|---------------|
//! | `set` | acquires, writes | dropped with a warning |
//! | poll tick | fetches and reconciles | skipped |
//!
//! A poll whose fetch overlapped a write discards its snapshot, even when
//! the write finished before the fetch returned. Devices never lock each other.
//!
//! # Rejected writes
//!
//! When a write fails, the cache keeps its last confirmed value and that
//! value is pushed back to the host after
//! [`SyncOptions::correction_delay`], then the error is returned.

mod guard;
mod options;
pub mod reconcile;

pub use guard::{WriteGuard, WritePermit, WriteState};
pub use options::SyncOptions;

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::client::KlereoClient;
use crate::command::CommandRequest;
use crate::device::{Device, DeviceId};
use crate::error::Error;
use crate::host::HostAdapter;
use crate::response::PoolParams;
use crate::state::{DeviceState, HeaterState, StateChange};
use crate::task::{FirstRun, PeriodicTask};

/// What became of a host write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The remote command resolved and the cache holds the new value.
    Applied,
    /// Another write was in flight; nothing was sent.
    Dropped,
    /// The characteristic is read-only; nothing was sent.
    Ignored,
}

/// What became of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// A write was in flight; the cache was left alone.
    Skipped,
    /// The snapshot was compared; these values were pushed to the host.
    Reconciled(Vec<StateChange>),
    /// The fetch failed; the cache was left alone.
    Failed,
}

impl PollOutcome {
    /// Returns the pushed changes, empty unless reconciled.
    #[must_use]
    pub fn changes(&self) -> &[StateChange] {
        match self {
            Self::Reconciled(changes) => changes,
            Self::Skipped | Self::Failed => &[],
        }
    }
}

/// Synchronizes one device with the remote pool.
///
/// Cheap to clone; clones share the same cache, guard and poll timer.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use klereo_lib::{ApiConfig, Credentials, KlereoClient};
/// use klereo_lib::device::{Device, OutputDevice};
/// use klereo_lib::event::EventBus;
/// use klereo_lib::state::StateChange;
/// use klereo_lib::sync::{DeviceStateSync, SyncOptions};
///
/// # async fn example() -> klereo_lib::Result<()> {
/// let client = Arc::new(KlereoClient::new(
///     Credentials::new("me@example.com", "secret"),
///     ApiConfig::new(),
/// )?);
/// let device: Device = OutputDevice::new(12345, "Pool", 0, "Lights").into();
/// let sync = DeviceStateSync::new(device, client, Arc::new(EventBus::new()), SyncOptions::new());
///
/// sync.start_polling();
/// sync.set(StateChange::On(true)).await?;
/// sync.stop_polling();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DeviceStateSync {
    inner: Arc<Inner>,
}

struct Inner {
    device: Device,
    client: Arc<KlereoClient>,
    host: Arc<dyn HostAdapter>,
    options: SyncOptions,
    state: RwLock<DeviceState>,
    guard: WriteGuard,
    poller: Mutex<Option<PeriodicTask>>,
}

impl DeviceStateSync {
    /// Creates the engine for `device` with a fresh default state.
    ///
    /// Polling does not start until [`start_polling`](Self::start_polling).
    #[must_use]
    pub fn new(
        device: Device,
        client: Arc<KlereoClient>,
        host: Arc<dyn HostAdapter>,
        options: SyncOptions,
    ) -> Self {
        let state = device.initial_state();
        Self {
            inner: Arc::new(Inner {
                device,
                client,
                host,
                options,
                state: RwLock::new(state),
                guard: WriteGuard::new(),
                poller: Mutex::new(None),
            }),
        }
    }

    /// Returns the device.
    #[must_use]
    pub fn device(&self) -> &Device {
        &self.inner.device
    }

    /// Returns the device id.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.inner.device.id()
    }

    /// Returns the timing options.
    #[must_use]
    pub fn options(&self) -> SyncOptions {
        self.inner.options
    }

    /// Returns whether a write is in flight.
    #[must_use]
    pub fn write_state(&self) -> WriteState {
        self.inner.guard.state()
    }

    /// Returns the cached state. Never performs I/O.
    #[must_use]
    pub fn get(&self) -> DeviceState {
        let state = *self.inner.state.read();
        tracing::debug!(device = %self.inner.device, ?state, "GET");
        state
    }

    /// Returns the cached value of the characteristic `template` addresses.
    #[must_use]
    pub fn characteristic(&self, template: &StateChange) -> Option<StateChange> {
        let value = self.inner.state.read().value_of(template);
        tracing::debug!(device = %self.inner.device, ?value, "GET characteristic");
        value
    }

    /// Returns the cached on/off value of an output device.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.inner.state.read().as_output().map(|s| s.on)
    }

    /// Returns the cached heater state of a heater device.
    #[must_use]
    pub fn heater_state(&self) -> Option<HeaterState> {
        self.inner.state.read().as_heater().copied()
    }

    /// Writes a characteristic value to the remote pool.
    ///
    /// - Output `On`: switches the output.
    /// - Heater `HeatingThresholdTemperature`: sets the water setpoint, after
    ///   checking it against the heater bounds.
    /// - Heater `Active` and `TargetHeaterCoolerState`: read-only, ignored.
    ///
    /// Returns once the remote command resolves. A write issued while
    /// another is in flight is dropped without any request, before its value
    /// is checked.
    ///
    /// # Errors
    ///
    /// Returns the dispatch or wait failure, or [`Error::Value`] for an out
    /// of range setpoint. In both cases the last confirmed value is pushed
    /// back to the host after the correction delay.
    /// Returns [`Error::UnsupportedCharacteristic`] if the device has no such
    /// writable characteristic.
    pub async fn set(&self, change: StateChange) -> Result<WriteOutcome, Error> {
        match (&self.inner.device, change) {
            (Device::Output(_), StateChange::On(_))
            | (Device::Heater(_), StateChange::HeatingThresholdTemperature(_)) => {}
            (Device::Heater(_), StateChange::Active(_) | StateChange::TargetHeaterCoolerState(_)) => {
                tracing::debug!(
                    device = %self.inner.device,
                    characteristic = change.characteristic(),
                    "SET ignored (read-only)"
                );
                return Ok(WriteOutcome::Ignored);
            }
            (device, _) => {
                return Err(Error::UnsupportedCharacteristic {
                    device: device.display_name().to_string(),
                    characteristic: change.characteristic(),
                });
            }
        }

        self.write(change).await
    }

    /// Shorthand for `set(StateChange::On(on))`.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn set_on(&self, on: bool) -> Result<WriteOutcome, Error> {
        self.set(StateChange::On(on)).await
    }

    /// Shorthand for `set(StateChange::HeatingThresholdTemperature(target))`.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub async fn set_target_temperature(&self, target: f64) -> Result<WriteOutcome, Error> {
        self.set(StateChange::HeatingThresholdTemperature(target))
            .await
    }

    async fn write(&self, change: StateChange) -> Result<WriteOutcome, Error> {
        let device = &self.inner.device;

        // Check and set happen in one atomic step
        let Some(_permit) = self.inner.guard.try_acquire() else {
            tracing::warn!(device = %device, "Already updating, skipping request");
            return Ok(WriteOutcome::Dropped);
        };

        let request = match self.command_for(change) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(device = %device, %change, error = %e, "Rejected value");
                self.schedule_correction(change);
                return Err(e);
            }
        };

        tracing::info!(device = %device, %change, "Setting");

        match self.inner.client.dispatch_and_wait(&request).await {
            Ok(result) => {
                self.inner.state.write().apply(&change);
                tracing::info!(
                    device = %device,
                    %change,
                    cmd_id = %result.cmd_id,
                    "Successfully set"
                );
                Ok(WriteOutcome::Applied)
            }
            Err(e) => {
                tracing::error!(device = %device, %change, error = %e, "Failed to set");
                self.schedule_correction(change);
                Err(e)
            }
        }
    }

    /// Builds the remote command for a writable characteristic.
    fn command_for(&self, change: StateChange) -> Result<CommandRequest, Error> {
        let device = &self.inner.device;
        let pool_id = device.pool_id();
        match (device, change) {
            (Device::Output(output), StateChange::On(on)) => {
                Ok(CommandRequest::set_output(pool_id, output.output_index, on))
            }
            (Device::Heater(heater), StateChange::HeatingThresholdTemperature(target)) => {
                let target = heater.setpoint_range.validate(target)?;
                Ok(CommandRequest::set_param(pool_id, PoolParams::WATER_SETPOINT, target))
            }
            (device, _) => Err(Error::UnsupportedCharacteristic {
                device: device.display_name().to_string(),
                characteristic: change.characteristic(),
            }),
        }
    }

    /// Pushes the cached value of the characteristic `change` addresses to
    /// the host, undoing an optimistic host-side update.
    pub fn push_correction(&self, change: &StateChange) {
        let Some(value) = self.inner.state.read().value_of(change) else {
            return;
        };
        tracing::debug!(device = %self.inner.device, %value, "Correcting host value");
        self.inner.host.update_characteristic(self.id(), value);
    }

    fn schedule_correction(&self, change: StateChange) {
        let sync = self.clone();
        let delay = self.inner.options.correction_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sync.push_correction(&change);
        });
    }

    /// Starts the poll timer. The first poll runs immediately.
    ///
    /// Does nothing if polling is already running.
    pub fn start_polling(&self) {
        let mut poller = self.inner.poller.lock();
        if poller.is_some() {
            tracing::debug!(device = %self.inner.device, "Polling already running");
            return;
        }

        let interval = self.inner.options.polling_interval();
        tracing::debug!(device = %self.inner.device, ?interval, "Starting status polling");

        // The timer must not keep the engine alive
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        *poller = Some(PeriodicTask::spawn(
            "device-poll",
            interval,
            FirstRun::Immediately,
            move || {
                let weak = weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        DeviceStateSync { inner }.poll_once().await;
                    }
                }
            },
        ));
    }

    /// Cancels the poll timer. Idempotent.
    ///
    /// A poll already in flight is allowed to finish.
    pub fn stop_polling(&self) {
        if let Some(task) = self.inner.poller.lock().take() {
            task.stop();
            tracing::debug!(device = %self.inner.device, "Stopped status polling");
        }
    }

    /// Returns `true` while the poll timer runs.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner.poller.lock().is_some()
    }

    /// Runs one poll: fetch, reconcile, push differences.
    ///
    /// Never fails; errors are logged and the cache keeps its last value.
    pub async fn poll_once(&self) -> PollOutcome {
        let device = &self.inner.device;

        if self.inner.guard.is_writing() {
            tracing::debug!(device = %device, "Write in progress, skipping poll");
            return PollOutcome::Skipped;
        }

        tracing::debug!(device = %device, "Updating state");
        let generation = self.inner.guard.generation();

        let details = match self.inner.client.get_pool_details(device.pool_id()).await {
            Ok(Some(details)) => details,
            Ok(None) => {
                tracing::warn!(pool_id = device.pool_id(), "No details found for pool");
                return PollOutcome::Reconciled(Vec::new());
            }
            Err(e) => {
                tracing::error!(device = %device, error = %e, "Failed to update state");
                return PollOutcome::Failed;
            }
        };

        let changes = {
            let mut state = self.inner.state.write();
            // A write may have started, or even finished, while the fetch
            // was in flight; its value wins over this snapshot
            if self.inner.guard.written_since(generation) {
                tracing::debug!(device = %device, "Write overlapped poll, discarding snapshot");
                return PollOutcome::Skipped;
            }
            let (next, changes) = reconcile::reconcile(device, &state, &details);
            *state = next;
            changes
        };

        for change in &changes {
            tracing::info!(device = %device, %change, "State changed");
            self.inner.host.update_characteristic(self.id(), *change);
        }

        PollOutcome::Reconciled(changes)
    }
}

impl std::fmt::Debug for DeviceStateSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStateSync")
            .field("device", &self.inner.device)
            .field("state", &*self.inner.state.read())
            .field("write_state", &self.inner.guard.state())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}
