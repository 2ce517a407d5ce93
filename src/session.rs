// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login and bearer-token lifecycle.
//!
//! The remote service documents a fixed 60 minute token lifetime and nothing
//! else, so expiry is tracked client-side: a token is trusted for
//! [`ApiConfig::token_lifetime`] (55 minutes by default) after it was issued.
//! Every authenticated call goes through
//! [`SessionManager::ensure_authenticated`] first.

use std::fmt;
use std::time::Duration;

use parking_lot::RwLock;
use sha1::{Digest, Sha1};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{Error, ParseError};
use crate::protocol::{ApiConfig, Authorization, Endpoint, HttpClient};
use crate::response::{JwtResponse, STATUS_OK};

/// Account credentials. Immutable for the lifetime of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the lowercase hex SHA-1 of the password, as the login expects.
    #[must_use]
    pub fn password_digest(&self) -> String {
        hex::encode(Sha1::digest(self.password.as_bytes()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A bearer token and the instant after which it is no longer trusted.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    expires_at: Instant,
}

impl Session {
    /// Creates a session expiring `lifetime` after `issued_at`.
    #[must_use]
    pub fn new(token: impl Into<String>, issued_at: Instant, lifetime: Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: issued_at + lifetime,
        }
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the expiry instant.
    #[must_use]
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// A session is valid strictly before its expiry instant.
    #[must_use]
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Owns the credentials, the login call and the current session.
///
/// The session is replaced wholesale by [`authenticate`](Self::authenticate)
/// and read everywhere else.
#[derive(Debug)]
pub struct SessionManager {
    credentials: Credentials,
    http: HttpClient,
    lang: String,
    app_version: String,
    token_lifetime: Duration,
    session: RwLock<Option<Session>>,
    login_lock: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager with no session.
    #[must_use]
    pub fn new(credentials: Credentials, http: HttpClient, config: &ApiConfig) -> Self {
        Self {
            credentials,
            http,
            lang: config.lang().to_string(),
            app_version: config.app_version().to_string(),
            token_lifetime: config.token_lifetime(),
            session: RwLock::new(None),
            login_lock: Mutex::new(()),
        }
    }

    /// Returns the credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Logs in and replaces the current session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the API rejects the credentials
    /// and [`Error::Transport`] if the HTTP layer fails.
    pub async fn authenticate(&self) -> Result<(), Error> {
        let _login = self.login_lock.lock().await;
        self.login().await
    }

    /// Returns `true` if no token is held or the held one has expired.
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh_at(Instant::now())
    }

    /// Same as [`needs_refresh`](Self::needs_refresh) at an arbitrary instant.
    #[must_use]
    pub fn needs_refresh_at(&self, now: Instant) -> bool {
        self.session
            .read()
            .as_ref()
            .is_none_or(|session| !session.is_valid_at(now))
    }

    /// Logs in iff [`needs_refresh`](Self::needs_refresh).
    ///
    /// Concurrent callers share a single login.
    ///
    /// # Errors
    ///
    /// Propagates login failures.
    pub async fn ensure_authenticated(&self) -> Result<(), Error> {
        if !self.needs_refresh() {
            return Ok(());
        }

        let _login = self.login_lock.lock().await;
        if self.needs_refresh() {
            self.login().await?;
        }
        Ok(())
    }

    /// Returns the current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.token.clone())
    }

    /// Returns a copy of the current session, if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Returns the bearer authorization for the current token.
    #[must_use]
    pub fn authorization(&self) -> Authorization {
        Authorization::Bearer(self.token())
    }

    async fn login(&self) -> Result<(), Error> {
        tracing::debug!(username = %self.credentials.username, "Authenticating");

        let fields = [
            ("login", self.credentials.username.clone()),
            ("password", self.credentials.password_digest()),
            ("version", self.app_version.clone()),
            ("lang", self.lang.clone()),
        ];

        let body = self
            .http
            .post_form(Endpoint::GetJwt, &fields, &Authorization::Anonymous)
            .await?;
        let response: JwtResponse = serde_json::from_value(body).map_err(ParseError::Json)?;

        if response.status != STATUS_OK {
            tracing::warn!(status = %response.status, "Login rejected");
            return Err(Error::Authentication);
        }

        let token = response
            .jwt
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ParseError::MissingField("jwt".to_string()))?;

        *self.session.write() = Some(Session::new(token, Instant::now(), self.token_lifetime));

        tracing::debug!("Authentication successful");
        Ok(())
    }
}
