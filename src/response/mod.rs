// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed decoding of Klereo Connect JSON responses.
//!
//! Every endpoint answers with an envelope `{"status": "...", "response": ...}`.
//! HTTP success does not imply API success: the `status` field must be
//! checked with [`ApiEnvelope::into_ok`] before the payload is trusted.

mod command;
mod pool;

pub use command::{CommandAck, WaitCommandResult};
pub use pool::{IoRename, PoolDetails, PoolInfo, PoolOutput, PoolParams, Probe};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ParseError};
use crate::protocol::Endpoint;

/// The `status` value reported on success.
pub const STATUS_OK: &str = "ok";

/// Generic `{status, response}` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// API-level status, `ok` on success.
    #[serde(default)]
    pub status: String,
    /// Endpoint-specific payload, absent on most failures.
    pub response: Option<T>,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// Decodes an envelope from an untyped JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the body does not have the expected shape.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        serde_json::from_value(value).map_err(ParseError::Json)
    }
}

impl<T> ApiEnvelope<T> {
    /// Returns `true` if the API reported success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Returns the payload if the API reported success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] carrying the raw status otherwise.
    pub fn into_ok(self, endpoint: Endpoint) -> Result<Option<T>, Error> {
        if self.is_ok() {
            Ok(self.response)
        } else {
            Err(Error::Api {
                endpoint,
                status: self.status,
            })
        }
    }
}

/// Response of the login endpoint.
///
/// Unlike the other endpoints the token sits next to `status` rather than
/// inside `response`.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtResponse {
    /// API-level status.
    #[serde(default)]
    pub status: String,
    /// Bearer token, present on success.
    #[serde(default)]
    pub jwt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_ok_with_payload() {
        let json = serde_json::json!({"status": "ok", "response": [1, 2, 3]});
        let env: ApiEnvelope<Vec<u8>> = ApiEnvelope::from_value(json).unwrap();
        let payload = env.into_ok(Endpoint::GetIndex).unwrap();
        assert_eq!(payload, Some(vec![1, 2, 3]));
    }

    #[test]
    fn envelope_error_status() {
        let json = serde_json::json!({"status": "error", "detail": "bad token"});
        let env: ApiEnvelope<Vec<u8>> = ApiEnvelope::from_value(json).unwrap();
        let err = env.into_ok(Endpoint::GetIndex).unwrap_err();
        assert!(matches!(err, Error::Api { status, .. } if status == "error"));
    }

    #[test]
    fn envelope_missing_status_is_not_ok() {
        let json = serde_json::json!({"response": []});
        let env: ApiEnvelope<Vec<u8>> = ApiEnvelope::from_value(json).unwrap();
        assert!(!env.is_ok());
    }

    #[test]
    fn jwt_response_parses() {
        let json = r#"{"status":"ok","token":"x","access":10,"jwt":"T1","id":42}"#;
        let resp: JwtResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.jwt.as_deref(), Some("T1"));
    }

    #[test]
    fn envelope_without_response_field() {
        let json = serde_json::json!({"status": "ok"});
        let env: ApiEnvelope<Vec<u8>> = ApiEnvelope::from_value(json).unwrap();
        assert_eq!(env.into_ok(Endpoint::GetIndex).unwrap(), None);
    }
}
