// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use crate::event::EventId;

/// shiftcal core errors.
///
/// The first four variants are caller errors: they surface immediately and no
/// local mutation is performed. [`Error::Sync`] is different: it reports a
/// failed mirror operation that has already been recorded as `sync-failed` on
/// the event, never a rolled-back local change.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No event with the given id exists.
    #[error("event not found: {0}")]
    NotFound(EventId),

    /// A per-date exception was requested against a non-recurring event.
    #[error("per-date exceptions require a recurring event")]
    InvalidRecurrence,

    /// A day-scoped delete was requested without a date.
    #[error("a specific date is required when deleting a single occurrence")]
    MissingDate,

    /// The delete option is not recognized.
    #[error("unrecognized delete option: {0}")]
    InvalidDeleteOption(String),

    /// The end of an event lies before its start.
    #[error("event end must not be before its start")]
    InvalidTimeRange,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// A remote mirror operation did not complete.
    #[error("remote sync failed: {0}")]
    Sync(#[from] shiftcal_remote::RemoteError),
}
