// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated access to the Klereo Connect API.
//!
//! [`KlereoClient`] combines the HTTP transport with the
//! [`SessionManager`]: read operations and command dispatch all pass
//! through [`SessionManager::ensure_authenticated`] before touching the
//! network, then check the API-level `status` of the answer.

mod dispatch;

use serde_json::Value;

use crate::error::Error;
use crate::protocol::{ApiConfig, Authorization, Endpoint, HttpClient};
use crate::response::{ApiEnvelope, PoolDetails, PoolInfo};
use crate::session::{Credentials, SessionManager};

/// Page size requested from `GetIndex`.
const POOL_PAGE_SIZE: u32 = 60;

/// Client for the Klereo Connect API.
///
/// # Examples
///
/// ```no_run
/// use klereo_lib::{ApiConfig, Credentials, KlereoClient};
///
/// # async fn example() -> klereo_lib::Result<()> {
/// let client = KlereoClient::new(
///     Credentials::new("me@example.com", "secret"),
///     ApiConfig::new(),
/// )?;
///
/// for pool in client.get_pools().await? {
///     if let Some(details) = client.get_pool_details(pool.id_system).await? {
///         println!("{}: {} outputs", details.pool_nickname, details.outs.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct KlereoClient {
    http: HttpClient,
    session: SessionManager,
    lang: String,
}

impl KlereoClient {
    /// Creates a client. No request is issued until the first call.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(credentials: Credentials, config: ApiConfig) -> Result<Self, Error> {
        let http = config.clone().into_client()?;
        let session = SessionManager::new(credentials, http.clone(), &config);
        Ok(Self {
            http,
            session,
            lang: config.lang().to_string(),
        })
    }

    /// Returns the session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Returns the request language.
    #[must_use]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Posts `fields` to `endpoint` and returns the untyped JSON body.
    ///
    /// When `requires_auth` is set the current bearer token is attached
    /// (or `Bearer undefined` if none is held yet). The caller checks the
    /// API-level `status`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure or non-2xx status.
    pub async fn request(
        &self,
        endpoint: Endpoint,
        fields: &[(&'static str, String)],
        requires_auth: bool,
    ) -> Result<Value, Error> {
        let authorization = if requires_auth {
            self.session.authorization()
        } else {
            Authorization::Anonymous
        };
        self.http.post_form(endpoint, fields, &authorization).await
    }

    /// Like [`request`](Self::request), authenticating as the endpoint requires.
    pub(crate) async fn call(
        &self,
        endpoint: Endpoint,
        fields: &[(&'static str, String)],
    ) -> Result<Value, Error> {
        self.request(endpoint, fields, endpoint.requires_auth())
            .await
    }

    /// Lists the pools of the account.
    ///
    /// # Errors
    ///
    /// Returns error on authentication, transport or API failure.
    pub async fn get_pools(&self) -> Result<Vec<PoolInfo>, Error> {
        self.session.ensure_authenticated().await?;

        tracing::debug!("Fetching pool list");

        let fields = [
            ("max", POOL_PAGE_SIZE.to_string()),
            ("start", "0".to_string()),
            ("S", String::new()),
            ("filter", String::new()),
            ("lang", self.lang.clone()),
        ];
        let body = self.call(Endpoint::GetIndex, &fields).await?;
        let pools = ApiEnvelope::<Vec<PoolInfo>>::from_value(body)?
            .into_ok(Endpoint::GetIndex)?
            .unwrap_or_default();

        tracing::debug!(count = pools.len(), "Found pools");
        Ok(pools)
    }

    /// Fetches the full snapshot of one pool.
    ///
    /// Returns `Ok(None)` if the API answered `ok` with an empty list.
    ///
    /// # Errors
    ///
    /// Returns error on authentication, transport or API failure.
    pub async fn get_pool_details(&self, pool_id: u64) -> Result<Option<PoolDetails>, Error> {
        self.session.ensure_authenticated().await?;

        tracing::debug!(pool_id, "Fetching pool details");

        let fields = [("poolID", pool_id.to_string()), ("lang", self.lang.clone())];
        let body = self.call(Endpoint::GetPoolDetails, &fields).await?;
        let details = ApiEnvelope::<Vec<PoolDetails>>::from_value(body)?
            .into_ok(Endpoint::GetPoolDetails)?
            .unwrap_or_default();

        Ok(details.into_iter().next())
    }
}
