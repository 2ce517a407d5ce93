// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared helpers for the wiremock integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use klereo_lib::device::{Device, DeviceId};
use klereo_lib::host::HostAdapter;
use klereo_lib::state::StateChange;
use klereo_lib::{ApiConfig, Credentials, KlereoClient};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const POOL_ID: u64 = 12345;

/// API configuration pointing at the mock server.
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig::new().with_base_url(format!("{}/php", server.uri()))
}

/// Client logged in as `user@example.com` against the mock server.
pub fn client(server: &MockServer) -> Arc<KlereoClient> {
    Arc::new(
        KlereoClient::new(
            Credentials::new("user@example.com", "password"),
            api_config(server),
        )
        .unwrap(),
    )
}

/// `POST /php/<file>`.
pub fn post(file: &str) -> MockBuilder {
    Mock::given(method("POST")).and(path(format!("/php/{file}")))
}

/// Multipart encoding of one text field, for `body_string_contains`.
pub fn form_field(name: &str, value: &str) -> String {
    format!("name=\"{name}\"\r\n\r\n{value}\r\n")
}

pub fn ok(response: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "response": response}))
}

pub fn api_error() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "error", "detail": "failed"}))
}

pub async fn mount_login(server: &MockServer, token: &str) {
    post("GetJWT.php")
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok", "jwt": token, "id": 42})),
        )
        .mount(server)
        .await;
}

pub async fn mount_wait_ok(server: &MockServer, cmd_id: u64) {
    post("WaitCommand.php")
        .respond_with(ok(json!({"cmdID": cmd_id, "status": 9, "detail": "Ok"})))
        .mount(server)
        .await;
}

/// Pool with a light (output 0), a filter (output 1), an unused output 2,
/// and a heater on output 4 with a water probe.
pub fn pool_details(light_status: i64, heater_status: i64, params: Value) -> Value {
    json!([{
        "idSystem": POOL_ID,
        "poolNickname": "La Faub",
        "probes": [
            {"index": 1, "type": 1, "filteredValue": 18.0},
            {"index": 16, "type": 5, "filteredValue": 26.5}
        ],
        "outs": [
            {"index": 0, "type": 0, "mode": 1, "status": light_status, "totalTime": 100, "map": 0},
            {"index": 1, "type": 0, "mode": 2, "status": 1, "totalTime": 5000, "map": 1},
            {"index": 2, "type": 0, "mode": 0, "status": 0, "totalTime": 0, "map": 0},
            {"index": 4, "type": 0, "mode": 3, "status": heater_status, "totalTime": 9000, "map": 4}
        ],
        "params": params,
        "IORename": [
            {"ioType": 1, "ioIndex": 0, "name": "Lights"},
            {"ioType": 1, "ioIndex": 1, "name": "Filter"}
        ]
    }])
}

/// Number of requests the server received for `file`.
pub async fn request_count(server: &MockServer, file: &str) -> usize {
    let target = format!("/php/{file}");
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == target)
        .count()
}

/// Host that records every push.
#[derive(Debug, Default)]
pub struct RecordingHost {
    updates: Mutex<Vec<(DeviceId, StateChange)>>,
    discovered: Mutex<Vec<DeviceId>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn updates(&self) -> Vec<(DeviceId, StateChange)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn discovered(&self) -> Vec<DeviceId> {
        self.discovered.lock().unwrap().clone()
    }
}

impl HostAdapter for RecordingHost {
    fn update_characteristic(&self, device: DeviceId, change: StateChange) {
        self.updates.lock().unwrap().push((device, change));
    }

    fn device_discovered(&self, device: &Device) {
        self.discovered.lock().unwrap().push(device.id());
    }
}
