// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatch and wait.
//!
//! `WaitCommand` is a single round trip: the remote side blocks until the
//! command resolves, so there is no client-side retry loop.

use serde_json::Value;

use super::KlereoClient;
use crate::command::{CommandId, CommandRequest, CommandResult};
use crate::error::{Error, ParseError};
use crate::protocol::Endpoint;
use crate::response::{ApiEnvelope, CommandAck, WaitCommandResult};

impl KlereoClient {
    /// Posts a mutation and returns the command id it was assigned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandDispatch`] if the API status is not `ok` or the
    /// result list is empty or lacks a command id.
    pub async fn dispatch(&self, request: &CommandRequest) -> Result<CommandId, Error> {
        self.session().ensure_authenticated().await?;

        let endpoint = request.endpoint();
        tracing::debug!(%request, "Dispatching command");

        let body = self
            .call(endpoint, &request.to_form_fields(self.lang()))
            .await?;

        let envelope = ApiEnvelope::<Vec<Value>>::from_value(body).map_err(|e| {
            Error::CommandDispatch {
                endpoint,
                reason: format!("malformed response: {e}"),
            }
        })?;

        if !envelope.is_ok() {
            return Err(Error::CommandDispatch {
                endpoint,
                reason: format!("API status {:?}", envelope.status),
            });
        }

        let first = envelope
            .response
            .and_then(|list| list.into_iter().next())
            .ok_or_else(|| Error::CommandDispatch {
                endpoint,
                reason: "empty result list".to_string(),
            })?;

        let ack: CommandAck =
            serde_json::from_value(first).map_err(|_| Error::CommandDispatch {
                endpoint,
                reason: "result carries no command id".to_string(),
            })?;

        let cmd_id = CommandId::new(ack.cmd_id);
        tracing::debug!(%cmd_id, "Command created");
        Ok(cmd_id)
    }

    /// Blocks until `cmd_id` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] if the API status is not `ok`.
    pub async fn wait_for_command(&self, cmd_id: CommandId) -> Result<CommandResult, Error> {
        self.session().ensure_authenticated().await?;

        tracing::debug!(%cmd_id, "Waiting for command to complete");

        let fields = [
            ("cmdID", cmd_id.to_string()),
            ("lang", self.lang().to_string()),
        ];
        let body = self.call(Endpoint::WaitCommand, &fields).await?;
        let envelope = ApiEnvelope::<Value>::from_value(body)?;

        if !envelope.is_ok() {
            let detail = envelope
                .response
                .as_ref()
                .and_then(|r| r.get("detail"))
                .and_then(Value::as_str)
                .map_or_else(|| format!("status {:?}", envelope.status), str::to_string);
            return Err(Error::CommandFailed { cmd_id, detail });
        }

        let payload = envelope
            .response
            .ok_or_else(|| ParseError::MissingField("response".to_string()))?;
        let result: WaitCommandResult = serde_json::from_value(payload).map_err(ParseError::Json)?;

        tracing::debug!(%cmd_id, status = result.status, "Command completed");

        Ok(CommandResult {
            cmd_id,
            terminal_status: result.status,
            detail: result.detail,
        })
    }

    /// Dispatches `request` then waits for it.
    ///
    /// Succeeds only if the mutation is accepted and the command resolves.
    ///
    /// # Errors
    ///
    /// Propagates dispatch and wait failures; no wait is attempted if the
    /// dispatch fails.
    pub async fn dispatch_and_wait(&self, request: &CommandRequest) -> Result<CommandResult, Error> {
        let cmd_id = self.dispatch(request).await?;
        self.wait_for_command(cmd_id).await
    }

    /// Switches an output and returns its command id.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn set_output(
        &self,
        pool_id: u64,
        output_index: u32,
        on: bool,
    ) -> Result<CommandId, Error> {
        self.dispatch(&CommandRequest::set_output(pool_id, output_index, on))
            .await
    }

    /// Sets a parameter and returns its command id.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn set_param(
        &self,
        pool_id: u64,
        param_id: &str,
        value: f64,
    ) -> Result<CommandId, Error> {
        self.dispatch(&CommandRequest::set_param(pool_id, param_id, value))
            .await
    }

    /// Switches an output and waits for the command to resolve.
    ///
    /// # Errors
    ///
    /// See [`dispatch_and_wait`](Self::dispatch_and_wait).
    pub async fn set_output_and_wait(
        &self,
        pool_id: u64,
        output_index: u32,
        on: bool,
    ) -> Result<CommandResult, Error> {
        self.dispatch_and_wait(&CommandRequest::set_output(pool_id, output_index, on))
            .await
    }

    /// Sets a parameter and waits for the command to resolve.
    ///
    /// # Errors
    ///
    /// See [`dispatch_and_wait`](Self::dispatch_and_wait).
    pub async fn set_param_and_wait(
        &self,
        pool_id: u64,
        param_id: &str,
        value: f64,
    ) -> Result<CommandResult, Error> {
        self.dispatch_and_wait(&CommandRequest::set_param(pool_id, param_id, value))
            .await
    }
}
