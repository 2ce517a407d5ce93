// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Klereo library.
//!
//! The hierarchy mirrors the layers a request crosses: the HTTP transport,
//! the login handshake, the API-level `status` field, and the two-step
//! command protocol (dispatch, then wait).

use thiserror::Error;

use crate::command::CommandId;
use crate::protocol::Endpoint;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP layer failed (network error or non-2xx status).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The login request was answered but the credentials were rejected.
    #[error("authentication failed: invalid credentials")]
    Authentication,

    /// HTTP succeeded but the API-level `status` field was not `ok`.
    #[error("{endpoint} returned status {status:?}")]
    Api {
        /// The endpoint that was called.
        endpoint: Endpoint,
        /// The raw `status` value reported by the API.
        status: String,
    },

    /// A mutation was accepted over HTTP but did not yield a command id.
    #[error("failed to dispatch command via {endpoint}: {reason}")]
    CommandDispatch {
        /// The mutation endpoint (`SetOut` or `SetParam`).
        endpoint: Endpoint,
        /// Why the dispatch was considered failed.
        reason: String,
    },

    /// A dispatched command reached a failure status.
    #[error("command {cmd_id} failed: {detail}")]
    CommandFailed {
        /// The command that failed.
        cmd_id: CommandId,
        /// Free-text detail reported by the API.
        detail: String,
    },

    /// A response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A value was rejected before any request was issued.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The device does not expose the requested characteristic for writing.
    #[error("{device} does not support writing {characteristic}")]
    UnsupportedCharacteristic {
        /// Display name of the device.
        device: String,
        /// The characteristic that was written.
        characteristic: &'static str,
    },

    /// The configuration is incomplete or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Device was not found in the bridge.
    #[error("device not found")]
    DeviceNotFound,
}

impl Error {
    /// Returns `true` if the error originates in the HTTP transport.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Errors raised by the HTTP transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} - {reason}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// The configured base URL is unusable.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to decoding API responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A setpoint lies outside the bounds advertised by the pool.
    #[error("setpoint {actual} is out of range [{min}, {max}]")]
    SetpointOutOfRange {
        /// Lowest accepted setpoint.
        min: f64,
        /// Highest accepted setpoint.
        max: f64,
        /// The rejected value.
        actual: f64,
    },

    /// A setpoint is not a finite number.
    #[error("setpoint must be a finite number")]
    NonFiniteSetpoint,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
