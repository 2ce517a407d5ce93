// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mutation requests and their form encoding.

use crate::protocol::{Endpoint, FormFields};

/// Communication mode flag sent with every mutation.
const COM_MODE: &str = "1";

/// Mode sent with `SetOut`: manual.
const MANUAL_MODE: &str = "0";

/// What a mutation changes.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    /// Switch an output on or off.
    SetOutput {
        /// Output index within the pool.
        output_index: u32,
        /// Requested state.
        on: bool,
    },
    /// Change a regulation parameter.
    SetParam {
        /// Parameter id, e.g. `ConsigneEau`.
        param_id: String,
        /// New numeric value.
        value: f64,
    },
}

/// A state-changing request addressed to one pool.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest {
    /// Target pool.
    pub pool_id: u64,
    /// The change.
    pub kind: CommandKind,
}

impl CommandRequest {
    /// Request to switch output `output_index` of `pool_id`.
    #[must_use]
    pub fn set_output(pool_id: u64, output_index: u32, on: bool) -> Self {
        Self {
            pool_id,
            kind: CommandKind::SetOutput { output_index, on },
        }
    }

    /// Request to set parameter `param_id` of `pool_id`.
    #[must_use]
    pub fn set_param(pool_id: u64, param_id: impl Into<String>, value: f64) -> Self {
        Self {
            pool_id,
            kind: CommandKind::SetParam {
                param_id: param_id.into(),
                value,
            },
        }
    }

    /// Returns the endpoint the request is posted to.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        match self.kind {
            CommandKind::SetOutput { .. } => Endpoint::SetOut,
            CommandKind::SetParam { .. } => Endpoint::SetParam,
        }
    }

    /// Encodes the request as form fields.
    #[must_use]
    pub fn to_form_fields(&self, lang: &str) -> FormFields {
        let pool_id = ("poolID", self.pool_id.to_string());
        match &self.kind {
            CommandKind::SetOutput { output_index, on } => vec![
                pool_id,
                ("outIdx", output_index.to_string()),
                ("newMode", MANUAL_MODE.to_string()),
                ("newState", if *on { "1" } else { "0" }.to_string()),
                ("comMode", COM_MODE.to_string()),
                ("lang", lang.to_string()),
            ],
            CommandKind::SetParam { param_id, value } => vec![
                pool_id,
                ("paramID", param_id.clone()),
                ("newValue", value.to_string()),
                ("comMode", COM_MODE.to_string()),
                ("lang", lang.to_string()),
            ],
        }
    }
}

impl std::fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            CommandKind::SetOutput { output_index, on } => write!(
                f,
                "pool {} output {} -> {}",
                self.pool_id,
                output_index,
                if *on { "ON" } else { "OFF" }
            ),
            CommandKind::SetParam { param_id, value } => {
                write!(f, "pool {} param {} -> {}", self.pool_id, param_id, value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_output_fields() {
        let fields = CommandRequest::set_output(12345, 0, true).to_form_fields("en");
        assert_eq!(
            fields,
            vec![
                ("poolID", "12345".to_string()),
                ("outIdx", "0".to_string()),
                ("newMode", "0".to_string()),
                ("newState", "1".to_string()),
                ("comMode", "1".to_string()),
                ("lang", "en".to_string()),
            ]
        );
    }

    #[test]
    fn set_output_off_state() {
        let fields = CommandRequest::set_output(1, 3, false).to_form_fields("en");
        assert!(fields.contains(&("newState", "0".to_string())));
    }

    #[test]
    fn set_param_fields() {
        let request = CommandRequest::set_param(17501, "ConsigneEau", 28.5);
        assert_eq!(request.endpoint(), Endpoint::SetParam);
        let fields = request.to_form_fields("fr");
        assert!(fields.contains(&("paramID", "ConsigneEau".to_string())));
        assert!(fields.contains(&("newValue", "28.5".to_string())));
        assert!(fields.contains(&("lang", "fr".to_string())));
    }

    #[test]
    fn integral_values_render_without_fraction() {
        let fields = CommandRequest::set_param(1, "ConsigneEau", 30.0).to_form_fields("en");
        assert!(fields.contains(&("newValue", "30".to_string())));
    }

    #[test]
    fn display() {
        assert_eq!(
            CommandRequest::set_output(12345, 0, true).to_string(),
            "pool 12345 output 0 -> ON"
        );
    }
}
