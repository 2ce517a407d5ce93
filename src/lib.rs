// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `klereo_lib` - A Rust library bridging Klereo pool controllers to a local
//! automation host.
//!
//! The Klereo Connect cloud API exposes a pool's outputs (lights, filter
//! pump, heating...) and probes. This library turns them into pollable,
//! controllable devices.
//!
//! # Layers
//!
//! - [`session`]: login and client-side token expiry
//! - [`protocol`]: multipart POSTs against the fixed endpoints
//! - [`client`]: authenticated reads and command dispatch-and-wait
//! - [`sync`]: one engine per device; cached reads, guarded writes, polling
//! - [`manager`]: discovery, session refresh and shutdown
//! - [`host`]: the trait through which values are pushed to the host
//!
//! # Quick Start
//!
//! ## Running the bridge
//!
//! ```no_run
//! use std::sync::Arc;
//! use klereo_lib::event::{DeviceEvent, EventBus};
//! use klereo_lib::manager::{Bridge, BridgeConfig};
//!
//! #[tokio::main]
//! async fn main() -> klereo_lib::Result<()> {
//!     let bus = Arc::new(EventBus::new());
//!     let mut events = bus.subscribe();
//!
//!     let config = BridgeConfig::from_json(
//!         r#"{"username": "me@example.com", "password": "secret"}"#,
//!     )?;
//!     let bridge = Bridge::new(config, bus)?;
//!     bridge.start().await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         if let DeviceEvent::CharacteristicChanged { device_id, change } = event {
//!             println!("{device_id}: {change}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Direct API access
//!
//! ```no_run
//! use klereo_lib::{ApiConfig, Credentials, KlereoClient};
//!
//! #[tokio::main]
//! async fn main() -> klereo_lib::Result<()> {
//!     let client = KlereoClient::new(Credentials::new("me@example.com", "secret"), ApiConfig::new())?;
//!
//!     let result = client.set_output_and_wait(12345, 0, true).await?;
//!     println!("command {} finished: {}", result.cmd_id, result.detail);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod command;
pub mod device;
pub mod error;
pub mod event;
pub mod host;
pub mod manager;
pub mod protocol;
pub mod response;
pub mod session;
pub mod state;
pub mod sync;
pub mod task;
pub mod types;

pub use client::KlereoClient;
pub use command::{CommandId, CommandKind, CommandRequest, CommandResult};
pub use device::{Device, DeviceId, HeaterDevice, OutputDevice};
pub use error::{Error, ParseError, Result, TransportError, ValueError};
pub use host::HostAdapter;
pub use manager::{Bridge, BridgeConfig};
pub use protocol::{ApiConfig, Endpoint};
pub use session::{Credentials, SessionManager};
pub use state::{DeviceState, StateChange};
pub use sync::{DeviceStateSync, SyncOptions, WriteOutcome};
pub use types::{HeaterCoolerState, SetpointRange, TargetHeaterCoolerState};
