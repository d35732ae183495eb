// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Occurrence expansion for calendar events.
//!
//! Expands an event over a date range into its concrete occurrences, applying
//! skip exceptions. Pure: the expander never touches storage, so correctness
//! after a mutation only requires re-reading state and expanding again.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::event::{Event, Recurrence};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,

    /// Last day of the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new range. An inverted range is allowed and simply empty.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Expands `event` over `range`, suppressing the dates in `skipped`.
///
/// The result is lazy and restartable (clone it to iterate again), yields
/// dates in ascending order, and is always finite: even an open-ended series
/// is clamped to the supplied range. Skip exceptions only apply to recurring
/// events; a single event is deleted wholesale, never excepted.
#[must_use]
pub fn expand(event: &Event, skipped: &BTreeSet<NaiveDate>, range: DateRange) -> Occurrences {
    let lower = range.start.max(event.start_date);
    let upper = match event.end_date {
        Some(end) => range.end.min(end),
        None => range.end,
    };

    Occurrences {
        start_date: event.start_date,
        recurrence: event.recurrence.clone(),
        skipped: if event.is_recurring() {
            skipped.clone()
        } else {
            BTreeSet::new()
        },
        cursor: lower,
        upper,
        done: lower > upper,
    }
}

/// Lazy iterator over the concrete occurrence dates of one event.
#[derive(Debug, Clone)]
pub struct Occurrences {
    start_date: NaiveDate,
    recurrence: Option<Recurrence>,
    skipped: BTreeSet<NaiveDate>,
    cursor: NaiveDate,
    upper: NaiveDate,
    done: bool,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while !self.done {
            let date = self.cursor;
            match date.succ_opt() {
                Some(next) if date < self.upper => self.cursor = next,
                _ => self.done = true,
            }

            let hit = match &self.recurrence {
                None => date == self.start_date,
                Some(rule) => {
                    rule.matches(self.start_date, date) && !self.skipped.contains(&date)
                }
            };
            if hit {
                return Some(date);
            }
        }
        None
    }
}
