// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;

use crate::event::{
    Event, EventId, EventKind, Recurrence, STABLE_FORMAT_DATE, STABLE_FORMAT_TIME, SyncStatus,
};
use crate::types::Pager;

#[derive(Debug, Clone)]
pub struct Events {
    pool: SqlitePool,
}

impl Events {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, event: &Event) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO events (id, summary, kind, owner, start_date, end_date, start_time, end_time, recurrence, remote_id, sync_status)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);
";

        let record = EventRecord::from_event(event);
        sqlx::query(SQL)
            .bind(&record.id)
            .bind(&record.summary)
            .bind(&record.kind)
            .bind(&record.owner)
            .bind(&record.start_date)
            .bind(&record.end_date)
            .bind(&record.start_time)
            .bind(&record.end_time)
            .bind(&record.recurrence)
            .bind(&record.remote_id)
            .bind(&record.sync_status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, id: &EventId) -> Result<Option<Event>, sqlx::Error> {
        const SQL: &str = "\
SELECT id, summary, kind, owner, start_date, end_date, start_time, end_time, recurrence, remote_id, sync_status
FROM events
WHERE id = ?;
";

        let record: Option<EventRecord> = sqlx::query_as(SQL)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        record.map(EventRecord::into_event).transpose()
    }

    pub async fn list(
        &self,
        owner: Option<&str>,
        pager: &Pager,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let mut sql = "\
SELECT id, summary, kind, owner, start_date, end_date, start_time, end_time, recurrence, remote_id, sync_status
FROM events
"
        .to_string();
        if owner.is_some() {
            sql += "WHERE owner = ? ";
        }
        sql += "ORDER BY start_date ASC, id ASC LIMIT ? OFFSET ?;";

        let mut query = sqlx::query_as(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }

        let records: Vec<EventRecord> = query
            .bind(pager.limit)
            .bind(pager.offset)
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(EventRecord::into_event).collect()
    }

    pub async fn count(&self, owner: Option<&str>) -> Result<i64, sqlx::Error> {
        let mut sql = "SELECT COUNT(*) FROM events".to_string();
        if owner.is_some() {
            sql += " WHERE owner = ?";
        }
        sql += ";";

        let mut query = sqlx::query_as(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }

        let row: (i64,) = query.fetch_one(&self.pool).await?;
        Ok(row.0)
    }

    /// Deletes the event and all of its exceptions in one transaction.
    /// Returns whether an event row was actually removed.
    pub async fn delete(&self, id: &EventId) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM exceptions WHERE event_id = ?;")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE id = ?;")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Records the outcome of a mirror operation.
    /// A `None` remote id leaves the stored id untouched.
    pub async fn set_sync_state(
        &self,
        id: &EventId,
        remote_id: Option<&str>,
        status: SyncStatus,
    ) -> Result<(), sqlx::Error> {
        match remote_id {
            Some(remote_id) => {
                sqlx::query("UPDATE events SET remote_id = ?, sync_status = ? WHERE id = ?;")
                    .bind(remote_id)
                    .bind(status.as_ref())
                    .bind(id.as_str())
                    .execute(&self.pool)
                    .await?;
            }
            None => {
                sqlx::query("UPDATE events SET sync_status = ? WHERE id = ?;")
                    .bind(status.as_ref())
                    .bind(id.as_str())
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventRecord {
    id: String,
    summary: String,
    kind: String,
    owner: String,
    start_date: String,
    end_date: Option<String>,
    start_time: String,
    end_time: String,
    recurrence: Option<String>,
    remote_id: Option<String>,
    sync_status: String,
}

impl EventRecord {
    fn from_event(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            summary: event.summary.clone(),
            kind: event.kind.to_string(),
            owner: event.owner.clone(),
            start_date: format_date(event.start_date),
            end_date: event.end_date.map(format_date),
            start_time: format_time(event.start_time),
            end_time: format_time(event.end_time),
            recurrence: event.recurrence.as_ref().map(ToString::to_string),
            remote_id: event.remote_id.as_ref().map(ToString::to_string),
            sync_status: event.sync_status.to_string(),
        }
    }

    fn into_event(self) -> Result<Event, sqlx::Error> {
        Ok(Event {
            id: EventId::new(self.id),
            summary: self.summary,
            kind: self
                .kind
                .parse::<EventKind>()
                .map_err(|()| decode_err("kind", &self.kind))?,
            owner: self.owner,
            start_date: parse_date(&self.start_date)?,
            end_date: self.end_date.as_deref().map(parse_date).transpose()?,
            start_time: parse_time(&self.start_time)?,
            end_time: parse_time(&self.end_time)?,
            recurrence: self
                .recurrence
                .as_deref()
                .map(|r| r.parse::<Recurrence>().map_err(|()| decode_err("recurrence", r)))
                .transpose()?,
            remote_id: self.remote_id.map(Into::into),
            sync_status: self
                .sync_status
                .parse::<SyncStatus>()
                .map_err(|()| decode_err("sync_status", &self.sync_status))?,
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(STABLE_FORMAT_DATE).to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format(STABLE_FORMAT_TIME).to_string()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(s, STABLE_FORMAT_DATE).map_err(|_| decode_err("date", s))
}

fn parse_time(s: &str) -> Result<NaiveTime, sqlx::Error> {
    NaiveTime::parse_from_str(s, STABLE_FORMAT_TIME).map_err(|_| decode_err("time", s))
}

pub(crate) fn decode_err(field: &str, value: &str) -> sqlx::Error {
    sqlx::Error::Decode(format!("invalid {field} in stored row: {value:?}").into())
}
