// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Best-effort mirroring of events into an external calendar.
//!
//! The local store is the source of truth; the remote calendar is a mirror
//! that may lag behind. A failed mirror operation marks the event
//! [`SyncStatus::SyncFailed`] and is retried by a later sync pass, never by
//! blocking the local mutation. Skip exceptions are local-only and are never
//! pushed to the remote at all.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use shiftcal_remote::{EventPayload, RemoteClient, RemoteError, RemoteId};

use crate::error::Error;
use crate::event::{Event, STABLE_FORMAT_DATE, STABLE_FORMAT_TIME, SyncStatus};
use crate::localdb::LocalDb;

/// The three calls the mirror relationship needs from a provider.
///
/// [`RemoteClient`] implements this over HTTP; tests substitute an in-process
/// fake.
#[async_trait]
pub trait RemoteCalendar: Send + Sync {
    /// Creates an event on the provider and returns its id.
    async fn create_event(&self, payload: &EventPayload) -> Result<RemoteId, RemoteError>;

    /// Updates an existing event on the provider.
    async fn update_event(&self, id: &RemoteId, payload: &EventPayload)
    -> Result<(), RemoteError>;

    /// Deletes an event on the provider.
    async fn delete_event(&self, id: &RemoteId) -> Result<(), RemoteError>;
}

#[async_trait]
impl RemoteCalendar for RemoteClient {
    async fn create_event(&self, payload: &EventPayload) -> Result<RemoteId, RemoteError> {
        RemoteClient::create_event(self, payload).await
    }

    async fn update_event(
        &self,
        id: &RemoteId,
        payload: &EventPayload,
    ) -> Result<(), RemoteError> {
        RemoteClient::update_event(self, id, payload).await
    }

    async fn delete_event(&self, id: &RemoteId) -> Result<(), RemoteError> {
        RemoteClient::delete_event(self, id).await
    }
}

/// Pushes local events to the remote calendar and records the outcome.
#[derive(Clone)]
pub struct SyncMediator {
    remote: Arc<dyn RemoteCalendar>,
    db: LocalDb,
}

impl fmt::Debug for SyncMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncMediator").finish_non_exhaustive()
    }
}

impl SyncMediator {
    pub fn new(remote: Arc<dyn RemoteCalendar>, db: LocalDb) -> Self {
        Self { remote, db }
    }

    /// Mirrors `event` to the remote calendar.
    ///
    /// An event without a remote id is created on the provider and the
    /// returned id is persisted; an event with one is updated in place. On
    /// failure the event is marked [`SyncStatus::SyncFailed`] locally and the
    /// provider error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sync`] when the provider call fails, or [`Error::Db`]
    /// when recording the outcome fails.
    pub async fn sync_event(&self, event: &Event) -> Result<(), Error> {
        let payload = build_payload(event);

        let result = match &event.remote_id {
            None => self.remote.create_event(&payload).await.map(Some),
            Some(id) => self.remote.update_event(id, &payload).await.map(|()| None),
        };

        match result {
            Ok(remote_id) => {
                tracing::info!(event_id = %event.id, "mirrored event to remote calendar");
                self.db
                    .events
                    .set_sync_state(&event.id, remote_id.as_deref(), SyncStatus::Synced)
                    .await?;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(event_id = %event.id, error = %e, "failed to mirror event");
                self.db
                    .events
                    .set_sync_state(&event.id, None, SyncStatus::SyncFailed)
                    .await?;
                Err(e.into())
            }
        }
    }

    /// Removes the remote mirror of an already-deleted event.
    ///
    /// A not-found answer from the provider counts as success: the mirror is
    /// gone either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sync`] when the provider call fails for any other
    /// reason.
    pub async fn delete_mirror(&self, remote_id: &RemoteId) -> Result<(), Error> {
        match self.remote.delete_event(remote_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%remote_id, "remote mirror already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Converts an event into its wire form.
///
/// The payload carries no recurrence and no exceptions: the mirror receives
/// the series envelope only, and skips stay local.
fn build_payload(event: &Event) -> EventPayload {
    EventPayload {
        summary: event.summary.clone(),
        kind: event.kind.to_string(),
        start_date: event.start_date.format(STABLE_FORMAT_DATE).to_string(),
        end_date: event
            .end_date
            .map(|d| d.format(STABLE_FORMAT_DATE).to_string()),
        start_time: event.start_time.format(STABLE_FORMAT_TIME).to_string(),
        end_time: event.end_time.format(STABLE_FORMAT_TIME).to_string(),
    }
}
