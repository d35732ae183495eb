// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use chrono::NaiveDate;
use shiftcal_remote::RemoteClient;
use tokio::sync::Mutex as AsyncMutex;

use crate::config::Config;
use crate::delete::{DeleteOption, DeletePlan, DeletionOutcome, plan_delete};
use crate::error::Error;
use crate::event::{Event, EventDraft, EventId};
use crate::expand::{DateRange, expand};
use crate::localdb::LocalDb;
use crate::sync::{RemoteCalendar, SyncMediator};
use crate::types::Pager;

/// One concrete day an event lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// The owning event.
    pub event: Event,

    /// The calendar day of this occurrence.
    pub date: NaiveDate,
}

/// The high-level shiftcal application.
///
/// Owns the local store, the optional remote mirror, and the per-event write
/// locks. The local store is the source of truth; remote calls never hold up
/// a local mutation.
#[derive(Debug)]
pub struct ShiftCal {
    config: Config,
    db: LocalDb,
    remote: Option<SyncMediator>,
    locks: EventLocks,
}

impl ShiftCal {
    /// Creates a new `ShiftCal` instance with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be prepared, the
    /// database cannot be opened, or the remote client cannot be built.
    pub async fn new(mut config: Config) -> Result<Self, Error> {
        config.normalize()?;

        let db_file = match &config.state_dir {
            Some(dir) => {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    Error::Config(format!("Failed to create state directory: {e}"))
                })?;
                Some(dir.join("shiftcal.db"))
            }
            None => None,
        };
        let db = LocalDb::open(db_file.as_deref()).await?;

        let remote = match &config.remote {
            Some(remote_config) => {
                let client = RemoteClient::new(remote_config.clone())
                    .map_err(|e| Error::Config(e.to_string()))?;
                Some(SyncMediator::new(Arc::new(client), db.clone()))
            }
            None => None,
        };

        Ok(Self {
            config,
            db,
            remote,
            locks: EventLocks::new(),
        })
    }

    /// Replaces the remote calendar with the given implementation.
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RemoteCalendar>) -> Self {
        self.remote = Some(SyncMediator::new(remote, self.db.clone()));
        self
    }

    /// The owner recorded on new events when the caller does not name one.
    #[must_use]
    pub fn default_owner(&self) -> Option<&str> {
        self.config.default_owner.as_deref()
    }

    /// Creates a new event from the draft and mirrors it best-effort.
    ///
    /// A failed mirror marks the event for a later retry; the creation itself
    /// still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeRange`] for an inverted draft, or a
    /// database error.
    pub async fn create_event(&self, draft: EventDraft) -> Result<Event, Error> {
        draft.validate()?;

        let event = draft.into_event(EventId::generate());
        self.db.events.insert(&event).await?;
        tracing::info!(event_id = %event.id, summary = %event.summary, "created event");

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.sync_event(&event).await {
                tracing::warn!(event_id = %event.id, error = %e, "event created, mirror pending");
            }
            return self.get_event(&event.id).await;
        }
        Ok(event)
    }

    /// Looks up an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no event has this id.
    pub async fn get_event(&self, id: &EventId) -> Result<Event, Error> {
        self.db
            .events
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    /// Lists events, optionally filtered by owner, ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list_events(
        &self,
        owner: Option<&str>,
        pager: &Pager,
    ) -> Result<Vec<Event>, Error> {
        Ok(self.db.events.list(owner, pager).await?)
    }

    /// Counts events, optionally filtered by owner.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn count_events(&self, owner: Option<&str>) -> Result<i64, Error> {
        Ok(self.db.events.count(owner).await?)
    }

    /// Applies a delete request to an event.
    ///
    /// `ThisDay` records a skip exception for `date` and leaves the series in
    /// place; `AllOccurrences` deletes the event, its exceptions, and its
    /// remote mirror. Writes to one event are serialized through a per-event
    /// lock; the remote call happens after the lock is released and never
    /// blocks or rolls back the local deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id,
    /// [`Error::InvalidRecurrence`] for `ThisDay` on a non-recurring event,
    /// [`Error::MissingDate`] for `ThisDay` without a date, or a database
    /// error.
    pub async fn request_delete(
        &self,
        id: &EventId,
        option: DeleteOption,
        date: Option<NaiveDate>,
    ) -> Result<DeletionOutcome, Error> {
        let lock = self.locks.lock_for(id);
        let guard = lock.lock().await;

        let event = self.get_event(id).await?;
        let plan = plan_delete(&event, option, date)?;

        let outcome = match plan {
            DeletePlan::SkipOccurrence(date) => {
                if !event.occurs_on(date) {
                    tracing::debug!(event_id = %id, %date, "skip on a date the series never produces");
                }
                self.db.exceptions.add_skip(id, date).await?;
                tracing::info!(event_id = %id, %date, "skipped one occurrence");
                DeletionOutcome::SkippedOccurrence {
                    event_id: id.clone(),
                    date,
                }
            }
            DeletePlan::DeleteSeries => {
                self.db.events.delete(id).await?;
                tracing::info!(event_id = %id, "deleted event");
                DeletionOutcome::DeletedSeries {
                    event_id: id.clone(),
                }
            }
        };
        drop(guard);

        if let DeletionOutcome::DeletedSeries { .. } = &outcome {
            self.locks.remove(id);

            // Best-effort: the local deletion stands even if the mirror
            // cannot be reached right now.
            if let (Some(remote), Some(remote_id)) = (&self.remote, &event.remote_id) {
                if let Err(e) = remote.delete_mirror(remote_id).await {
                    tracing::warn!(event_id = %id, error = %e, "failed to remove remote mirror");
                }
            }
        }

        Ok(outcome)
    }

    /// Removes a previously recorded skip exception, restoring the occurrence.
    ///
    /// Removing a skip that was never recorded is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown event id, or a database
    /// error.
    pub async fn remove_exception(&self, id: &EventId, date: NaiveDate) -> Result<(), Error> {
        let lock = self.locks.lock_for(id);
        let _guard = lock.lock().await;

        self.get_event(id).await?;
        self.db.exceptions.remove(id, date).await?;
        tracing::info!(event_id = %id, %date, "restored occurrence");
        Ok(())
    }

    /// Expands all events into concrete occurrences within `range`.
    ///
    /// Occurrences are ordered by date, then by event id for a stable order
    /// within one day. Skipped dates are absent.
    ///
    /// # Errors
    ///
    /// Returns a database error if a query fails.
    pub async fn list_occurrences(
        &self,
        owner: Option<&str>,
        range: DateRange,
    ) -> Result<Vec<Occurrence>, Error> {
        let events = self.db.events.list(owner, &Pager::unbounded()).await?;

        let mut occurrences = Vec::new();
        for event in events {
            let skipped = self.db.exceptions.list_dates(&event.id).await?;
            for date in expand(&event, &skipped, range) {
                occurrences.push(Occurrence {
                    event: event.clone(),
                    date,
                });
            }
        }
        occurrences.sort_by(|a, b| (a.date, a.event.id.as_str()).cmp(&(b.date, b.event.id.as_str())));
        Ok(occurrences)
    }

    /// Pushes one event to the remote calendar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no remote calendar is configured,
    /// [`Error::NotFound`] for an unknown id, or [`Error::Sync`] when the
    /// provider call fails.
    pub async fn sync_event(&self, id: &EventId) -> Result<(), Error> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| Error::Config("no remote calendar configured".into()))?;

        let event = self.get_event(id).await?;
        remote.sync_event(&event).await
    }

    /// Closes the application and its database connection.
    pub async fn close(self) {
        self.db.close().await;
    }
}

/// Per-event write locks.
///
/// Serializes mutations of a single event; different events proceed in
/// parallel. Entries are dropped once their event is deleted.
#[derive(Debug, Clone, Default)]
struct EventLocks(Arc<StdMutex<HashMap<String, Arc<AsyncMutex<()>>>>>);

impl EventLocks {
    fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, id: &EventId) -> Arc<AsyncMutex<()>> {
        let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(id.to_string()).or_default().clone()
    }

    fn remove(&self, id: &EventId) {
        let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        map.remove(id.as_str());
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::*;
    use crate::event::{Recurrence, SyncStatus};
    use crate::tests_utils::{
        FailMode, FakeRemote, RemoteCall, setup_test_db, single_draft, weekly_draft,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quarter() -> DateRange {
        DateRange::new(date(2025, 1, 1), date(2025, 3, 31))
    }

    async fn setup() -> ShiftCal {
        ShiftCal {
            config: Config::default(),
            db: setup_test_db().await,
            remote: None,
            locks: EventLocks::new(),
        }
    }

    async fn setup_with_remote(fail_mode: FailMode) -> (ShiftCal, Arc<FakeRemote>) {
        let remote = Arc::new(FakeRemote::failing(fail_mode));
        let cal = setup().await.with_remote(remote.clone());
        (cal, remote)
    }

    #[tokio::test]
    async fn skipping_one_monday_leaves_the_rest_of_the_series() {
        // Arrange: weekly Mondays from 2025-01-06 through 2025-03-31.
        let cal = setup().await;
        let event = cal.create_event(weekly_draft("Mondays")).await.unwrap();
        assert_eq!(cal.list_occurrences(None, quarter()).await.unwrap().len(), 13);

        // Act
        let outcome = cal
            .request_delete(&event.id, DeleteOption::ThisDay, Some(date(2025, 2, 3)))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            outcome,
            DeletionOutcome::SkippedOccurrence {
                event_id: event.id.clone(),
                date: date(2025, 2, 3),
            }
        );
        let occurrences = cal.list_occurrences(None, quarter()).await.unwrap();
        assert_eq!(occurrences.len(), 12);
        assert!(occurrences.iter().all(|o| o.date != date(2025, 2, 3)));
        assert!(occurrences.iter().any(|o| o.date == date(2025, 1, 27)));
        assert!(occurrences.iter().any(|o| o.date == date(2025, 2, 10)));

        // The event row itself is untouched.
        let stored = cal.get_event(&event.id).await.unwrap();
        assert_eq!(stored.recurrence, Some(Recurrence::weekly([Weekday::Mon])));
    }

    #[tokio::test]
    async fn skipping_the_same_date_twice_is_idempotent() {
        // Arrange
        let cal = setup().await;
        let event = cal.create_event(weekly_draft("Mondays")).await.unwrap();

        // Act
        for _ in 0..2 {
            cal.request_delete(&event.id, DeleteOption::ThisDay, Some(date(2025, 2, 3)))
                .await
                .unwrap();
        }

        // Assert
        assert_eq!(cal.list_occurrences(None, quarter()).await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn deleting_the_series_removes_event_exceptions_and_mirror() {
        // Arrange
        let (cal, remote) = setup_with_remote(FailMode::None).await;
        let event = cal.create_event(weekly_draft("Mondays")).await.unwrap();
        cal.request_delete(&event.id, DeleteOption::ThisDay, Some(date(2025, 2, 3)))
            .await
            .unwrap();

        // Act
        let outcome = cal
            .request_delete(&event.id, DeleteOption::AllOccurrences, None)
            .await
            .unwrap();

        // Assert
        assert_eq!(
            outcome,
            DeletionOutcome::DeletedSeries {
                event_id: event.id.clone(),
            }
        );
        assert!(matches!(
            cal.get_event(&event.id).await,
            Err(Error::NotFound(_))
        ));
        assert!(cal.list_occurrences(None, quarter()).await.unwrap().is_empty());
        assert!(matches!(remote.calls().last(), Some(RemoteCall::Delete(_))));
    }

    #[tokio::test]
    async fn local_deletion_stands_when_the_mirror_is_unreachable() {
        // Arrange: creation succeeds, then the provider goes dark.
        let (cal, remote) = setup_with_remote(FailMode::None).await;
        let event = cal.create_event(weekly_draft("Mondays")).await.unwrap();
        assert_eq!(event.sync_status, SyncStatus::Synced);
        remote.set_fail_mode(FailMode::Transient);

        // Act
        let outcome = cal
            .request_delete(&event.id, DeleteOption::AllOccurrences, None)
            .await
            .unwrap();

        // Assert
        assert!(matches!(outcome, DeletionOutcome::DeletedSeries { .. }));
        assert!(matches!(
            cal.get_event(&event.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn this_day_on_a_single_event_is_rejected() {
        // Arrange
        let cal = setup().await;
        let event = cal.create_event(single_draft("One-off")).await.unwrap();

        // Act
        let result = cal
            .request_delete(&event.id, DeleteOption::ThisDay, Some(event.start_date))
            .await;

        // Assert: the event survives untouched.
        assert!(matches!(result, Err(Error::InvalidRecurrence)));
        assert!(cal.get_event(&event.id).await.is_ok());
    }

    #[tokio::test]
    async fn this_day_without_a_date_is_rejected() {
        let cal = setup().await;
        let event = cal.create_event(weekly_draft("Mondays")).await.unwrap();

        let result = cal
            .request_delete(&event.id, DeleteOption::ThisDay, None)
            .await;
        assert!(matches!(result, Err(Error::MissingDate)));
    }

    #[tokio::test]
    async fn deleting_an_unknown_event_is_not_found() {
        let cal = setup().await;

        let result = cal
            .request_delete(&EventId::from("ghost"), DeleteOption::AllOccurrences, None)
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_storage() {
        let cal = setup().await;
        let mut draft = single_draft("Backwards");
        draft.end_time = chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap();

        let result = cal.create_event(draft).await;
        assert!(matches!(result, Err(Error::InvalidTimeRange)));
        assert_eq!(cal.count_events(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn removing_an_exception_restores_the_occurrence() {
        // Arrange
        let cal = setup().await;
        let event = cal.create_event(weekly_draft("Mondays")).await.unwrap();
        cal.request_delete(&event.id, DeleteOption::ThisDay, Some(date(2025, 2, 3)))
            .await
            .unwrap();

        // Act
        cal.remove_exception(&event.id, date(2025, 2, 3))
            .await
            .unwrap();

        // Assert
        let occurrences = cal.list_occurrences(None, quarter()).await.unwrap();
        assert_eq!(occurrences.len(), 13);
        assert!(occurrences.iter().any(|o| o.date == date(2025, 2, 3)));
    }

    #[tokio::test]
    async fn occurrences_are_ordered_and_scoped_by_owner() {
        // Arrange
        let cal = setup().await;
        let mut draft = weekly_draft("Mondays");
        draft.owner = "tech-1".to_string();
        cal.create_event(draft).await.unwrap();
        let mut draft = single_draft("One-off");
        draft.owner = "tech-2".to_string();
        cal.create_event(draft).await.unwrap();

        // Act
        let all = cal.list_occurrences(None, quarter()).await.unwrap();
        let mine = cal.list_occurrences(Some("tech-2"), quarter()).await.unwrap();

        // Assert
        assert_eq!(all.len(), 14);
        assert!(all.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].event.owner, "tech-2");
    }

    #[tokio::test]
    async fn creation_mirrors_best_effort() {
        // Arrange: the provider is down at creation time.
        let (cal, remote) = setup_with_remote(FailMode::Transient).await;

        // Act
        let event = cal.create_event(weekly_draft("Mondays")).await.unwrap();

        // Assert: created locally, marked for retry.
        assert_eq!(event.sync_status, SyncStatus::SyncFailed);
        assert_eq!(event.remote_id, None);

        // A later sync pass completes the mirror.
        remote.set_fail_mode(FailMode::None);
        cal.sync_event(&event.id).await.unwrap();
        let synced = cal.get_event(&event.id).await.unwrap();
        assert_eq!(synced.sync_status, SyncStatus::Synced);
        assert!(synced.remote_id.is_some());
    }

    #[tokio::test]
    async fn sync_without_a_remote_is_a_config_error() {
        let cal = setup().await;
        let event = cal.create_event(single_draft("One-off")).await.unwrap();

        let result = cal.sync_event(&event.id).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
