// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};
use std::num::NonZeroU32;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use shiftcal_remote::RemoteId;

use crate::error::Error;

/// Stable string format for calendar dates in storage and on the wire.
pub(crate) const STABLE_FORMAT_DATE: &str = "%Y-%m-%d";

/// Stable string format for times of day in storage and on the wire.
pub(crate) const STABLE_FORMAT_TIME: &str = "%H:%M";

/// The unique identifier of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new `EventId` from a string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for EventId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Whether an event marks time as free or blocked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EventKind {
    /// The owner is available during the event.
    #[default]
    Availability,

    /// The owner is unavailable during the event.
    Unavailability,
}

const KIND_AVAILABILITY: &str = "availability";
const KIND_UNAVAILABILITY: &str = "unavailability";

impl AsRef<str> for EventKind {
    fn as_ref(&self) -> &str {
        match self {
            EventKind::Availability => KIND_AVAILABILITY,
            EventKind::Unavailability => KIND_UNAVAILABILITY,
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for EventKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            KIND_AVAILABILITY => Ok(EventKind::Availability),
            KIND_UNAVAILABILITY => Ok(EventKind::Unavailability),
            _ => Err(()),
        }
    }
}

/// State of the event's remote mirror.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Never pushed to the remote calendar.
    #[default]
    Unsynced,

    /// The remote mirror matches the last local sync.
    Synced,

    /// The last mirror operation failed; retryable by a later sync pass.
    SyncFailed,
}

const STATUS_UNSYNCED: &str = "unsynced";
const STATUS_SYNCED: &str = "synced";
const STATUS_SYNC_FAILED: &str = "sync-failed";

impl AsRef<str> for SyncStatus {
    fn as_ref(&self) -> &str {
        match self {
            SyncStatus::Unsynced => STATUS_UNSYNCED,
            SyncStatus::Synced => STATUS_SYNCED,
            SyncStatus::SyncFailed => STATUS_SYNC_FAILED,
        }
    }
}

impl Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for SyncStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            STATUS_UNSYNCED => Ok(SyncStatus::Unsynced),
            STATUS_SYNCED => Ok(SyncStatus::Synced),
            STATUS_SYNC_FAILED => Ok(SyncStatus::SyncFailed),
            _ => Err(()),
        }
    }
}

/// Recurrence rule of an event, as a closed set of variants.
///
/// Keeping this a tagged enum (rather than loose flags and fields) lets the
/// occurrence expander match exhaustively: every rule the type can express is
/// a rule the expander handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    /// Occurs on the given weekdays, every week.
    Weekly(Vec<Weekday>),

    /// Occurs every `n` days, counted from the event's start date.
    EveryNDays(NonZeroU32),
}

impl Recurrence {
    /// Builds a weekly rule, normalizing the weekday set (sorted, deduplicated).
    #[must_use]
    pub fn weekly(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut days: Vec<Weekday> = days.into_iter().collect();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        Self::Weekly(days)
    }

    /// Whether the rule produces an occurrence on `date`, for a series
    /// starting at `start`. Dates before `start` never match.
    #[must_use]
    pub fn matches(&self, start: NaiveDate, date: NaiveDate) -> bool {
        if date < start {
            return false;
        }
        match self {
            Recurrence::Weekly(days) => days.contains(&date.weekday()),
            Recurrence::EveryNDays(n) => {
                (date - start).num_days() % i64::from(n.get()) == 0
            }
        }
    }
}

const fn weekday_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

impl Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Weekly(days) => {
                write!(f, "weekly:")?;
                for (i, day) in days.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", weekday_token(*day))?;
                }
                Ok(())
            }
            Recurrence::EveryNDays(n) => write!(f, "every:{n}"),
        }
    }
}

impl FromStr for Recurrence {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(days) = value.strip_prefix("weekly:") {
            let days = days
                .split(',')
                .map(|t| t.trim().parse::<Weekday>().map_err(|_| ()))
                .collect::<Result<Vec<_>, _>>()?;
            if days.is_empty() {
                return Err(());
            }
            Ok(Recurrence::weekly(days))
        } else if let Some(n) = value.strip_prefix("every:") {
            let n = n.trim().parse::<NonZeroU32>().map_err(|_| ())?;
            Ok(Recurrence::EveryNDays(n))
        } else {
            Err(())
        }
    }
}

/// A calendar event, single or recurring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The unique identifier of the event.
    pub id: EventId,

    /// Human-readable title.
    pub summary: String,

    /// Availability or unavailability.
    pub kind: EventKind,

    /// Reference to the owning user.
    pub owner: String,

    /// First calendar day of the event.
    pub start_date: NaiveDate,

    /// Last calendar day; `None` means the series is open-ended.
    /// For non-recurring events this always equals `start_date`.
    pub end_date: Option<NaiveDate>,

    /// Daily start time.
    pub start_time: NaiveTime,

    /// Daily end time.
    pub end_time: NaiveTime,

    /// Recurrence rule; `None` denotes exactly one occurrence on `start_date`.
    pub recurrence: Option<Recurrence>,

    /// Id of the mirrored event on the remote calendar, if one exists.
    pub remote_id: Option<RemoteId>,

    /// State of the remote mirror.
    pub sync_status: SyncStatus,
}

impl Event {
    /// Whether the event is a recurring series.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Whether the event produces an occurrence on `date`, exceptions aside.
    #[must_use]
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        match &self.recurrence {
            None => date == self.start_date,
            Some(rule) => rule.matches(self.start_date, date),
        }
    }
}

/// Draft for an event, used for creating new events.
#[derive(Debug, Clone)]
pub struct EventDraft {
    /// Human-readable title.
    pub summary: String,

    /// Availability or unavailability.
    pub kind: EventKind,

    /// Reference to the owning user.
    pub owner: String,

    /// First calendar day of the event.
    pub start_date: NaiveDate,

    /// Last calendar day; `None` means open-ended (recurring only).
    pub end_date: Option<NaiveDate>,

    /// Daily start time.
    pub start_time: NaiveTime,

    /// Daily end time.
    pub end_time: NaiveTime,

    /// Recurrence rule; `None` for a single event.
    pub recurrence: Option<Recurrence>,
}

impl EventDraft {
    /// Checks that the end of the event is not before its start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeRange`] if the end date precedes the start
    /// date or the end time precedes the start time.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(Error::InvalidTimeRange);
            }
        }
        if self.end_time < self.start_time {
            return Err(Error::InvalidTimeRange);
        }
        Ok(())
    }

    /// Converts the draft into an event with the given id.
    ///
    /// New events always start unsynced; non-recurring events get their end
    /// date pinned to the start date so they denote exactly one occurrence.
    pub(crate) fn into_event(self, id: EventId) -> Event {
        let end_date = if self.recurrence.is_none() {
            Some(self.start_date)
        } else {
            self.end_date
        };

        Event {
            id,
            summary: self.summary,
            kind: self.kind,
            owner: self.owner,
            start_date: self.start_date,
            end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            recurrence: self.recurrence,
            remote_id: None,
            sync_status: SyncStatus::Unsynced,
        }
    }
}
