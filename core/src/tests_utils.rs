// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for the in-crate test suites.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Weekday};
use shiftcal_remote::{EventPayload, RemoteError, RemoteId};

use crate::event::{EventDraft, EventKind, Recurrence};
use crate::localdb::LocalDb;
use crate::sync::RemoteCalendar;

/// Opens a fresh in-memory database with migrations applied.
pub async fn setup_test_db() -> LocalDb {
    LocalDb::open(None).await.expect("Failed to open database")
}

/// A one-off availability event on 2025-01-06, 09:00-17:00.
pub fn single_draft(summary: &str) -> EventDraft {
    EventDraft {
        summary: summary.to_string(),
        kind: EventKind::Availability,
        owner: "tech-1".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        end_date: None,
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        recurrence: None,
    }
}

/// A weekly Monday unavailability from 2025-01-06 through 2025-03-31.
pub fn weekly_draft(summary: &str) -> EventDraft {
    EventDraft {
        kind: EventKind::Unavailability,
        end_date: Some(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()),
        recurrence: Some(Recurrence::weekly([Weekday::Mon])),
        ..single_draft(summary)
    }
}

/// What the fake remote should do with incoming calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailMode {
    /// Every call succeeds.
    #[default]
    None,

    /// Every call fails with a retryable error.
    Transient,

    /// Every call fails with a not-found answer.
    NotFound,
}

/// A recorded call against [`FakeRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Create(EventPayload),
    Update(RemoteId, EventPayload),
    Delete(RemoteId),
}

/// In-process stand-in for the remote calendar provider.
#[derive(Debug, Default)]
pub struct FakeRemote {
    pub fail_mode: Mutex<FailMode>,
    pub calls: Mutex<Vec<RemoteCall>>,
    next_id: Mutex<u32>,
}

impl FakeRemote {
    pub fn failing(mode: FailMode) -> Self {
        Self {
            fail_mode: Mutex::new(mode),
            ..Self::default()
        }
    }

    pub fn set_fail_mode(&self, mode: FailMode) {
        *self.fail_mode.lock().unwrap() = mode;
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), RemoteError> {
        match *self.fail_mode.lock().unwrap() {
            FailMode::None => Ok(()),
            FailMode::Transient => Err(RemoteError::Timeout),
            FailMode::NotFound => Err(RemoteError::NotFound("/events/unknown".to_string())),
        }
    }
}

#[async_trait]
impl RemoteCalendar for FakeRemote {
    async fn create_event(&self, payload: &EventPayload) -> Result<RemoteId, RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push(RemoteCall::Create(payload.clone()));
        self.check()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        Ok(RemoteId::from(format!("ext-{next_id}")))
    }

    async fn update_event(
        &self,
        id: &RemoteId,
        payload: &EventPayload,
    ) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push(RemoteCall::Update(id.clone(), payload.clone()));
        self.check()
    }

    async fn delete_event(&self, id: &RemoteId) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push(RemoteCall::Delete(id.clone()));
        self.check()
    }
}
