// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and status mapping.

use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::config::{AuthMethod, RemoteConfig};
use crate::error::RemoteError;

/// HTTP client for remote calendar operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: RemoteConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a request with authentication headers.
    pub fn build_request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        let mut req = self.client.request(method, url);

        match &self.config.auth {
            AuthMethod::Basic { username, password } => {
                req = req.basic_auth(username, Some(password));
            }
            AuthMethod::Bearer { token } => {
                req = req.bearer_auth(token);
            }
            AuthMethod::None => {}
        }

        req
    }

    /// Executes a request and classifies HTTP errors.
    ///
    /// 404 maps to [`RemoteError::NotFound`] carrying the request path, 401/403
    /// to [`RemoteError::Auth`], everything else unexpected to
    /// [`RemoteError::Http`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = req.send().await?;

        match resp.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(resp),
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound(resp.url().path().to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let text = read_body(resp).await;
                Err(RemoteError::Auth(text))
            }
            status => {
                let text = read_body(resp).await;
                Err(RemoteError::Http(format!("{status}: {text}")))
            }
        }
    }
}

async fn read_body(resp: Response) -> String {
    resp.text()
        .await
        .unwrap_or_else(|_| "Unable to read response".to_string())
}
