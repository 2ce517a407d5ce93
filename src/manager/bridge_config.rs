// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-supplied configuration of the bridge.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::session::Credentials;
use crate::sync::SyncOptions;

/// Configuration read from the host's JSON config.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use klereo_lib::manager::BridgeConfig;
///
/// let config = BridgeConfig::from_json(
///     r#"{"username": "me@example.com", "password": "secret", "pollingInterval": 60000}"#,
/// )
/// .unwrap();
/// assert_eq!(config.polling_interval(), Duration::from_secs(60));
///
/// // Built in code
/// let config = BridgeConfig::new("me@example.com", "secret").with_name("Pool");
/// assert_eq!(config.polling_interval(), Duration::from_secs(30));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Account login.
    #[serde(default)]
    pub username: String,
    /// Account password, in clear.
    #[serde(default)]
    pub password: String,
    /// Poll period in milliseconds. Absent or zero means the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_interval: Option<u64>,
    /// Name the host shows for the bridge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl BridgeConfig {
    /// Poll period used when none is configured, in milliseconds.
    pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 30_000;

    /// Creates a configuration with the default poll period.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            polling_interval: None,
            name: None,
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed or
    /// [`validate`](Self::validate) fails.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the poll period.
    #[must_use]
    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = Some(u64::try_from(interval.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the bridge name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Checks that both credentials are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the missing field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.trim().is_empty() {
            return Err(Error::Config("username is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("password is required".to_string()));
        }
        Ok(())
    }

    /// Returns the effective poll period.
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        let ms = self
            .polling_interval
            .filter(|ms| *ms > 0)
            .unwrap_or(Self::DEFAULT_POLLING_INTERVAL_MS);
        Duration::from_millis(ms)
    }

    /// Returns the credential pair.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    /// Returns the device engine options derived from this configuration.
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions::new().with_polling_interval(self.polling_interval())
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("polling_interval", &self.polling_interval)
            .field("name", &self.name)
            .finish()
    }
}
