// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::event::{EventId, STABLE_FORMAT_DATE};
use crate::localdb::events::parse_date;

/// Per-date skip overrides for recurring events.
///
/// An exception suppresses a single occurrence of a series without touching
/// the event row itself. Exceptions are local-only state: they are never
/// mirrored to a remote calendar.
#[derive(Debug, Clone)]
pub struct Exceptions {
    pool: SqlitePool,
}

impl Exceptions {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records a skip for `date`. Recording the same skip twice is a no-op.
    pub async fn add_skip(&self, event_id: &EventId, date: NaiveDate) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO exceptions (event_id, date)
VALUES (?, ?)
ON CONFLICT (event_id, date) DO NOTHING;
";

        sqlx::query(SQL)
            .bind(event_id.as_str())
            .bind(date.format(STABLE_FORMAT_DATE).to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes the skip for `date`, if any. Removing a missing skip is a no-op.
    pub async fn remove(&self, event_id: &EventId, date: NaiveDate) -> Result<(), sqlx::Error> {
        const SQL: &str = "DELETE FROM exceptions WHERE event_id = ? AND date = ?;";

        sqlx::query(SQL)
            .bind(event_id.as_str())
            .bind(date.format(STABLE_FORMAT_DATE).to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All skipped dates for one event.
    pub async fn list_dates(&self, event_id: &EventId) -> Result<BTreeSet<NaiveDate>, sqlx::Error> {
        const SQL: &str = "SELECT date FROM exceptions WHERE event_id = ? ORDER BY date ASC;";

        let rows: Vec<(String,)> = sqlx::query_as(SQL)
            .bind(event_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|(date,)| parse_date(date)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_utils::setup_test_db;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn add_skip_then_list_returns_the_date() {
        // Arrange
        let db = setup_test_db().await;
        let id = EventId::from("event-1");

        // Act
        db.exceptions
            .add_skip(&id, date(2025, 2, 3))
            .await
            .expect("Failed to add skip");

        // Assert
        let dates = db.exceptions.list_dates(&id).await.unwrap();
        assert_eq!(dates, BTreeSet::from([date(2025, 2, 3)]));
    }

    #[tokio::test]
    async fn add_skip_is_idempotent() {
        // Arrange
        let db = setup_test_db().await;
        let id = EventId::from("event-1");

        // Act
        db.exceptions.add_skip(&id, date(2025, 2, 3)).await.unwrap();
        db.exceptions.add_skip(&id, date(2025, 2, 3)).await.unwrap();

        // Assert
        let dates = db.exceptions.list_dates(&id).await.unwrap();
        assert_eq!(dates.len(), 1);
    }

    #[tokio::test]
    async fn remove_deletes_only_the_given_date() {
        // Arrange
        let db = setup_test_db().await;
        let id = EventId::from("event-1");
        db.exceptions.add_skip(&id, date(2025, 2, 3)).await.unwrap();
        db.exceptions
            .add_skip(&id, date(2025, 2, 10))
            .await
            .unwrap();

        // Act
        db.exceptions.remove(&id, date(2025, 2, 3)).await.unwrap();

        // Assert
        let dates = db.exceptions.list_dates(&id).await.unwrap();
        assert_eq!(dates, BTreeSet::from([date(2025, 2, 10)]));
    }

    #[tokio::test]
    async fn remove_missing_skip_is_a_no_op() {
        let db = setup_test_db().await;
        let id = EventId::from("event-1");

        db.exceptions.remove(&id, date(2025, 2, 3)).await.unwrap();

        assert!(db.exceptions.list_dates(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_dates_is_scoped_per_event() {
        // Arrange
        let db = setup_test_db().await;
        db.exceptions
            .add_skip(&EventId::from("event-1"), date(2025, 2, 3))
            .await
            .unwrap();
        db.exceptions
            .add_skip(&EventId::from("event-2"), date(2025, 2, 10))
            .await
            .unwrap();

        // Act
        let dates = db
            .exceptions
            .list_dates(&EventId::from("event-1"))
            .await
            .unwrap();

        // Assert
        assert_eq!(dates, BTreeSet::from([date(2025, 2, 3)]));
    }
}
