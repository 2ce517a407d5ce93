// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Top-level coordinator: discovery, session refresh and shutdown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use super::BridgeConfig;
use crate::client::KlereoClient;
use crate::device::{DeviceId, discover_devices};
use crate::error::Error;
use crate::host::HostAdapter;
use crate::protocol::ApiConfig;
use crate::sync::{DeviceStateSync, SyncOptions};
use crate::task::{FirstRun, PeriodicTask};

/// Owns the API client, one [`DeviceStateSync`] per device, and the session
/// refresh timer.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use klereo_lib::event::EventBus;
/// use klereo_lib::manager::{Bridge, BridgeConfig};
///
/// #[tokio::main]
/// async fn main() -> klereo_lib::Result<()> {
///     let bus = Arc::new(EventBus::new());
///     let mut events = bus.subscribe();
///
///     let bridge = Bridge::new(BridgeConfig::new("me@example.com", "secret"), bus)?;
///     bridge.start().await?;
///
///     while let Ok(event) = events.recv().await {
///         println!("{event:?}");
///     }
///
///     bridge.shutdown();
///     Ok(())
/// }
/// ```
pub struct Bridge {
    config: BridgeConfig,
    client: Arc<KlereoClient>,
    host: Arc<dyn HostAdapter>,
    options: SyncOptions,
    refresh_interval: Duration,
    devices: RwLock<HashMap<DeviceId, DeviceStateSync>>,
    refresh_task: Mutex<Option<PeriodicTask>>,
}

impl Bridge {
    /// Creates a bridge against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: BridgeConfig, host: Arc<dyn HostAdapter>) -> Result<Self, Error> {
        Self::with_api_config(config, ApiConfig::new(), host)
    }

    /// Creates a bridge with a custom API configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid, or a
    /// transport error if the HTTP client cannot be created.
    pub fn with_api_config(
        config: BridgeConfig,
        api: ApiConfig,
        host: Arc<dyn HostAdapter>,
    ) -> Result<Self, Error> {
        Self::with_options(config.sync_options(), config, api, host)
    }

    /// Creates a bridge with explicit device engine options.
    ///
    /// # Errors
    ///
    /// See [`with_api_config`](Self::with_api_config).
    pub fn with_options(
        options: SyncOptions,
        config: BridgeConfig,
        api: ApiConfig,
        host: Arc<dyn HostAdapter>,
    ) -> Result<Self, Error> {
        config.validate()?;

        let refresh_interval = api.token_lifetime();
        let client = KlereoClient::new(config.credentials(), api)?;

        tracing::debug!(name = ?config.name, "Finished initializing bridge");

        Ok(Self {
            config,
            client: Arc::new(client),
            host,
            options,
            refresh_interval,
            devices: RwLock::new(HashMap::new()),
            refresh_task: Mutex::new(None),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the shared API client.
    #[must_use]
    pub fn client(&self) -> &Arc<KlereoClient> {
        &self.client
    }

    /// Starts the session refresh timer, then discovers devices.
    ///
    /// The timer keeps running if discovery fails.
    ///
    /// # Errors
    ///
    /// Returns the discovery failure.
    pub async fn start(&self) -> Result<(), Error> {
        self.start_session_refresh();
        if let Err(e) = self.discover().await {
            tracing::error!(error = %e, "Failed to discover devices");
            return Err(e);
        }
        Ok(())
    }

    /// Logs in, lists the pools and registers one engine per new device.
    ///
    /// Devices already registered are kept as they are. Each new device is
    /// announced to the host and starts polling. Returns the new ids.
    ///
    /// # Errors
    ///
    /// Returns the first login, listing or detail fetch failure.
    pub async fn discover(&self) -> Result<Vec<DeviceId>, Error> {
        self.client.session().authenticate().await?;

        let pools = self.client.get_pools().await?;
        if pools.is_empty() {
            tracing::warn!("No pools found on account");
            return Ok(Vec::new());
        }

        let mut added = Vec::new();
        for pool in pools {
            tracing::info!(pool_id = pool.id_system, name = %pool.pool_nickname, "Found pool");

            let Some(details) = self.client.get_pool_details(pool.id_system).await? else {
                tracing::warn!(pool_id = pool.id_system, "No details found for pool");
                continue;
            };

            for device in discover_devices(&details) {
                let id = device.id();
                if self.devices.read().contains_key(&id) {
                    tracing::debug!(device = %device, "Device already registered");
                    continue;
                }

                tracing::info!(device = %device, "Adding new device");
                self.host.device_discovered(&device);

                let sync = DeviceStateSync::new(
                    device,
                    Arc::clone(&self.client),
                    Arc::clone(&self.host),
                    self.options,
                );
                sync.start_polling();
                self.devices.write().insert(id, sync);
                added.push(id);
            }
        }

        Ok(added)
    }

    /// Starts re-authenticating every token lifetime. Does nothing if the
    /// timer already runs.
    ///
    /// Refresh failures are logged; the next request logs in again.
    pub fn start_session_refresh(&self) {
        let mut task = self.refresh_task.lock();
        if task.is_some() {
            return;
        }

        let client = Arc::clone(&self.client);
        *task = Some(PeriodicTask::spawn(
            "session-refresh",
            self.refresh_interval,
            FirstRun::AfterPeriod,
            move || {
                let client = Arc::clone(&client);
                async move {
                    tracing::debug!("Refreshing authentication token");
                    if let Err(e) = client.session().authenticate().await {
                        tracing::error!(error = %e, "Failed to refresh token");
                    }
                }
            },
        ));
    }

    /// Returns the engine of a device.
    #[must_use]
    pub fn device(&self, id: DeviceId) -> Option<DeviceStateSync> {
        self.devices.read().get(&id).cloned()
    }

    /// Returns the engine of a device, or [`Error::DeviceNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown id.
    pub fn require_device(&self, id: DeviceId) -> Result<DeviceStateSync, Error> {
        self.device(id).ok_or(Error::DeviceNotFound)
    }

    /// Returns every registered engine.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceStateSync> {
        self.devices.read().values().cloned().collect()
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    /// Removes a device and stops its polling.
    pub fn remove_device(&self, id: DeviceId) -> bool {
        match self.devices.write().remove(&id) {
            Some(sync) => {
                sync.stop_polling();
                true
            }
            None => false,
        }
    }

    /// Stops the session refresh timer and every device's poll timer.
    ///
    /// Operations already in flight complete. Idempotent.
    pub fn shutdown(&self) {
        if let Some(task) = self.refresh_task.lock().take() {
            task.stop();
        }
        for sync in self.devices.read().values() {
            sync.stop_polling();
        }
        tracing::info!("Bridge shut down");
    }

    /// Returns `true` while the session refresh timer runs.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresh_task.lock().is_some()
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("refresh_interval", &self.refresh_interval)
            .field("device_count", &self.device_count())
            .finish_non_exhaustive()
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}
