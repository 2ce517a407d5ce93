// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire-level access to the Klereo Connect API.
//!
//! - [`ApiConfig`]: base path, timeout, language and token lifetime
//! - [`HttpClient`]: posts multipart forms and returns untyped JSON
//! - [`Endpoint`]: the fixed set of remote endpoints

mod endpoint;
mod http;

pub use endpoint::{Endpoint, FormFields};
pub use http::{ApiConfig, Authorization, HttpClient};
