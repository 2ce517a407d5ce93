// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the Klereo Connect API.

use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::Form;
use serde_json::Value;

use crate::error::{Error, ParseError, TransportError};
use crate::protocol::endpoint::Endpoint;

// ============================================================================
// ApiConfig - Connection parameters for the remote API
// ============================================================================

/// Configuration for the Klereo Connect API.
///
/// # Examples
///
/// ```
/// use klereo_lib::protocol::ApiConfig;
/// use std::time::Duration;
///
/// let config = ApiConfig::new()
///     .with_base_url("http://127.0.0.1:8080/php")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://127.0.0.1:8080/php");
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
    timeout: Duration,
    lang: String,
    app_version: String,
    token_lifetime: Duration,
}

impl ApiConfig {
    /// Production API base path.
    pub const DEFAULT_BASE_URL: &'static str = "https://connect.klereo.fr/php";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Client version reported at login.
    pub const DEFAULT_APP_VERSION: &'static str = "324-w";
    /// Tokens live 60 minutes server-side; refresh 5 minutes early.
    pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(55 * 60);

    /// Creates a configuration pointing at the production API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            lang: "en".to_string(),
            app_version: Self::DEFAULT_APP_VERSION.to_string(),
            token_lifetime: Self::DEFAULT_TOKEN_LIFETIME,
        }
    }

    /// Overrides the API base path (trailing slashes are ignored).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `lang` field sent with every request.
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Sets how long a freshly issued token is trusted client-side.
    #[must_use]
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the request language.
    #[must_use]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Returns the client version reported at login.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Returns the client-side token lifetime.
    #[must_use]
    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not HTTP(S) or the client cannot be built.
    pub fn into_client(self) -> Result<HttpClient, TransportError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(TransportError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TransportError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url,
            client,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Authorization
// ============================================================================

/// Authorization attached to an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// No `authorization` header.
    Anonymous,
    /// Bearer header; `None` renders the literal `Bearer undefined` the
    /// remote API has always been sent before a token exists.
    Bearer(Option<String>),
}

impl Authorization {
    /// Returns the header value, if any.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Bearer(Some(token)) => Some(format!("Bearer {token}")),
            Self::Bearer(None) => Some("Bearer undefined".to_string()),
        }
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client posting multipart forms to the Klereo Connect API.
///
/// The client only checks the HTTP layer; callers inspect the API-level
/// `status` field of the returned JSON.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.file_name())
    }

    /// Posts `fields` to `endpoint` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network failure or non-2xx status, and
    /// [`ParseError`] if the body is not JSON.
    pub async fn post_form(
        &self,
        endpoint: Endpoint,
        fields: &[(&'static str, String)],
        authorization: &Authorization,
    ) -> Result<Value, Error> {
        let url = self.build_url(endpoint);

        let form = fields
            .iter()
            .fold(Form::new(), |form, (key, value)| form.text(*key, value.clone()));

        let mut request = self.client.post(&url).multipart(form);
        if let Some(header) = authorization.header_value() {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        tracing::debug!(endpoint = %endpoint, "Making request");

        let response = request.send().await.map_err(|e| {
            tracing::error!(endpoint = %endpoint, error = %e, "Request failed");
            TransportError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
            tracing::error!(endpoint = %endpoint, error = %err, "Request failed");
            return Err(err.into());
        }

        let body = response.text().await.map_err(TransportError::Http)?;
        tracing::trace!(endpoint = %endpoint, body = %body, "Received response");

        serde_json::from_str(&body).map_err(|e| Error::Parse(ParseError::Json(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_config_defaults() {
        let config = ApiConfig::new();
        assert_eq!(config.base_url(), "https://connect.klereo.fr/php");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.lang(), "en");
        assert_eq!(config.app_version(), "324-w");
        assert_eq!(config.token_lifetime(), Duration::from_secs(3300));
    }

    #[test]
    fn api_config_trims_trailing_slash() {
        let config = ApiConfig::new().with_base_url("http://localhost:1234/php/");
        assert_eq!(config.base_url(), "http://localhost:1234/php");
    }

    #[test]
    fn into_client_rejects_non_http_url() {
        let result = ApiConfig::new().with_base_url("ftp://example.com").into_client();
        assert!(matches!(result, Err(TransportError::InvalidAddress(_))));
    }

    #[test]
    fn build_url_appends_file_name() {
        let client = ApiConfig::new()
            .with_base_url("http://localhost:1234/php")
            .into_client()
            .unwrap();
        assert_eq!(
            client.build_url(Endpoint::GetPoolDetails),
            "http://localhost:1234/php/GetPoolDetails.php"
        );
    }

    #[test]
    fn authorization_header_values() {
        assert_eq!(Authorization::Anonymous.header_value(), None);
        assert_eq!(
            Authorization::Bearer(Some("T1".to_string())).header_value(),
            Some("Bearer T1".to_string())
        );
        assert_eq!(
            Authorization::Bearer(None).header_value(),
            Some("Bearer undefined".to_string())
        );
    }
}
