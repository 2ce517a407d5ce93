// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State-changing commands.
//!
//! A mutation is a two-step exchange: `SetOut`/`SetParam` answers with a
//! server-assigned [`CommandId`], then `WaitCommand` blocks until that
//! command resolves. The dispatching itself lives on
//! [`KlereoClient`](crate::KlereoClient).
//!
//! | Request | Endpoint | Fields |
//! |---------|----------|--------|
//! | [`CommandKind::SetOutput`] | `SetOut` | `poolID, outIdx, newMode=0, newState=0/1, comMode=1` |
//! | [`CommandKind::SetParam`] | `SetParam` | `poolID, paramID, newValue, comMode=1` |
//!
//! # Examples
//!
//! ```
//! use klereo_lib::command::CommandRequest;
//! use klereo_lib::protocol::Endpoint;
//!
//! let request = CommandRequest::set_output(12345, 0, true);
//! assert_eq!(request.endpoint(), Endpoint::SetOut);
//!
//! let fields = request.to_form_fields("en");
//! assert!(fields.contains(&("newState", "1".to_string())));
//! ```

mod request;

pub use request::{CommandKind, CommandRequest};

use std::fmt;

/// Server-assigned handle of a pending mutation.
///
/// Each id is consumed by exactly one wait call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

impl CommandId {
    /// Wraps a raw command id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal outcome of a command, as reported by `WaitCommand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// The command that resolved.
    pub cmd_id: CommandId,
    /// Numeric terminal status.
    pub terminal_status: i64,
    /// Free-text detail.
    pub detail: String,
}
