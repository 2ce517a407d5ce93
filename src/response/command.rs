// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatch and wait responses.

use serde::Deserialize;

/// One element of the `SetOut` / `SetParam` response list.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandAck {
    /// Server-assigned command id, consumed by `WaitCommand`.
    #[serde(rename = "cmdID")]
    pub cmd_id: u64,
}

/// Payload of `WaitCommand`.
#[derive(Debug, Clone, Deserialize)]
pub struct WaitCommandResult {
    /// Numeric terminal status.
    #[serde(default)]
    pub status: i64,
    /// Free-text detail.
    #[serde(default)]
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ack() {
        let ack: CommandAck =
            serde_json::from_str(r#"{"cmdID": 100001, "poolID": 12345}"#).unwrap();
        assert_eq!(ack.cmd_id, 100_001);
    }

    #[test]
    fn parse_wait_result() {
        let result: WaitCommandResult = serde_json::from_str(
            r#"{"cmdID": 100001, "status": 9, "startTime": 1, "updateTime": 2, "detail": "Ok"}"#,
        )
        .unwrap();
        assert_eq!(result.status, 9);
        assert_eq!(result.detail, "Ok");
    }
}
