// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Deletion coordination.
//!
//! A recurring event is logically an open set of occurrences, so "delete this
//! event" is ambiguous: the caller must say whether one day or the whole
//! series goes away. The decision is a single pure function; the facade
//! executes the resulting plan against the stores.

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::Error;
use crate::event::{Event, EventId};

/// How a delete request applies to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DeleteOption {
    /// Suppress the occurrence on one specific date; the series stays.
    ThisDay,

    /// Delete the event and every occurrence it implies.
    AllOccurrences,
}

const OPTION_THIS_DAY: &str = "this_day";
const OPTION_ALL_OCCURRENCES: &str = "all_occurrences";

impl AsRef<str> for DeleteOption {
    fn as_ref(&self) -> &str {
        match self {
            DeleteOption::ThisDay => OPTION_THIS_DAY,
            DeleteOption::AllOccurrences => OPTION_ALL_OCCURRENCES,
        }
    }
}

impl Display for DeleteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for DeleteOption {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            OPTION_THIS_DAY => Ok(DeleteOption::ThisDay),
            OPTION_ALL_OCCURRENCES => Ok(DeleteOption::AllOccurrences),
            other => Err(Error::InvalidDeleteOption(other.to_string())),
        }
    }
}

/// What a delete request resolved to, before any store is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeletePlan {
    /// Record a skip exception for one date.
    SkipOccurrence(NaiveDate),

    /// Delete the event, cascading exceptions and the remote mirror.
    DeleteSeries,
}

/// Decides how a delete request applies to `event`.
///
/// Caller errors (`InvalidRecurrence`, `MissingDate`) come out of here before
/// anything is mutated. A non-recurring event can only be deleted wholesale:
/// silently turning a "this day" request into an exception (or into a full
/// delete) would change the blast radius the caller asked for.
pub(crate) fn plan_delete(
    event: &Event,
    option: DeleteOption,
    date: Option<NaiveDate>,
) -> Result<DeletePlan, Error> {
    match (event.is_recurring(), option, date) {
        (false, DeleteOption::ThisDay, _) => Err(Error::InvalidRecurrence),
        (false, DeleteOption::AllOccurrences, _) => Ok(DeletePlan::DeleteSeries),
        (true, DeleteOption::ThisDay, Some(date)) => Ok(DeletePlan::SkipOccurrence(date)),
        (true, DeleteOption::ThisDay, None) => Err(Error::MissingDate),
        (true, DeleteOption::AllOccurrences, _) => Ok(DeletePlan::DeleteSeries),
    }
}

/// The committed result of a delete request.
///
/// The two variants carry materially different blast radius, so callers get
/// distinct messages out of [`DeletionOutcome::message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// One occurrence was suppressed; the series is otherwise untouched.
    SkippedOccurrence {
        /// The owning event.
        event_id: EventId,
        /// The suppressed date.
        date: NaiveDate,
    },

    /// The event and all of its occurrences were deleted.
    DeletedSeries {
        /// The deleted event.
        event_id: EventId,
    },
}

impl DeletionOutcome {
    /// A user-facing success message naming what actually happened.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            DeletionOutcome::SkippedOccurrence { date, .. } => format!(
                "Removed the occurrence on {date}; the rest of the series is unchanged"
            ),
            DeletionOutcome::DeletedSeries { .. } => {
                "Deleted the event and all of its occurrences".to_string()
            }
        }
    }
}
