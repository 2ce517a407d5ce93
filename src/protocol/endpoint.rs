// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote API endpoints.

use std::fmt;

/// Ordered form fields sent as a multipart body.
pub type FormFields = Vec<(&'static str, String)>;

/// An endpoint of the Klereo Connect API.
///
/// Every endpoint is a `POST` with a multipart form body and a JSON answer
/// carrying an API-level `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Login, returns a bearer token. The only unauthenticated endpoint.
    GetJwt,
    /// Lists the pools of the account.
    GetIndex,
    /// Full snapshot of one pool.
    GetPoolDetails,
    /// Switches an output on or off.
    SetOut,
    /// Changes a regulation parameter.
    SetParam,
    /// Blocks until a dispatched command resolves.
    WaitCommand,
}

impl Endpoint {
    /// Returns the file name appended to the API base path.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::GetJwt => "GetJWT.php",
            Self::GetIndex => "GetIndex.php",
            Self::GetPoolDetails => "GetPoolDetails.php",
            Self::SetOut => "SetOut.php",
            Self::SetParam => "SetParam.php",
            Self::WaitCommand => "WaitCommand.php",
        }
    }

    /// Returns `true` if the endpoint expects a bearer token.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::GetJwt)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetJwt => "GetJWT",
            Self::GetIndex => "GetIndex",
            Self::GetPoolDetails => "GetPoolDetails",
            Self::SetOut => "SetOut",
            Self::SetParam => "SetParam",
            Self::WaitCommand => "WaitCommand",
        };
        f.write_str(name)
    }
}
