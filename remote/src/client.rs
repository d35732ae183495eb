// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Client for the opaque remote event store.

use std::sync::Arc;

use reqwest::Method;

use crate::config::RemoteConfig;
use crate::error::RemoteError;
use crate::http::HttpClient;
use crate::types::{EventPayload, RemoteId};

/// Client for the remote calendar provider.
///
/// The surface is exactly what the mirror relationship needs: create an event
/// and learn its id, update an event by id, delete an event by id.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: Arc<HttpClient>,
    base_url: String,
}

#[derive(Debug, serde::Deserialize)]
struct CreatedResponse {
    id: String,
}

impl RemoteClient {
    /// Creates a new remote calendar client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RemoteError::Config("base_url must not be empty".into()));
        }

        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
            base_url,
        })
    }

    /// Creates an event on the provider and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider answers without
    /// an event id.
    pub async fn create_event(&self, payload: &EventPayload) -> Result<RemoteId, RemoteError> {
        let url = format!("{}/events", self.base_url);
        tracing::debug!(url, summary = %payload.summary, "creating remote event");

        let resp = self
            .http
            .execute(self.http.build_request(Method::POST, &url).json(payload))
            .await?;

        let created: CreatedResponse = resp
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        if created.id.is_empty() {
            return Err(RemoteError::InvalidResponse(
                "provider returned an empty event id".into(),
            ));
        }

        Ok(RemoteId::new(created.id))
    }

    /// Updates an existing event on the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; [`RemoteError::NotFound`] if the
    /// provider no longer knows the id.
    pub async fn update_event(
        &self,
        id: &RemoteId,
        payload: &EventPayload,
    ) -> Result<(), RemoteError> {
        let url = self.event_url(id);
        tracing::debug!(url, "updating remote event");

        self.http
            .execute(self.http.build_request(Method::PUT, &url).json(payload))
            .await?;
        Ok(())
    }

    /// Deletes an event on the provider.
    ///
    /// A [`RemoteError::NotFound`] answer means the object is already gone;
    /// whether that counts as success is the caller's call.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_event(&self, id: &RemoteId) -> Result<(), RemoteError> {
        let url = self.event_url(id);
        tracing::debug!(url, "deleting remote event");

        self.http
            .execute(self.http.build_request(Method::DELETE, &url))
            .await?;
        Ok(())
    }

    fn event_url(&self, id: &RemoteId) -> String {
        format!("{}/events/{}", self.base_url, id.as_str())
    }
}
