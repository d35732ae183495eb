// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Core of the shiftcal availability calendar.
//!
//! Events may recur (weekly by weekday set, or every N days), be suppressed
//! for a single date via skip exceptions, and be mirrored best-effort into an
//! external calendar. [`ShiftCal`] is the entry point; everything else is
//! exported for callers that need the domain types.

mod config;
mod delete;
mod error;
mod event;
mod expand;
mod localdb;
mod shiftcal;
mod sync;
#[cfg(test)]
mod tests_utils;
mod types;

pub use crate::config::{APP_NAME, Config};
pub use crate::delete::{DeleteOption, DeletionOutcome};
pub use crate::error::Error;
pub use crate::event::{Event, EventDraft, EventId, EventKind, Recurrence, SyncStatus};
pub use crate::expand::{DateRange, Occurrences, expand};
pub use crate::shiftcal::{Occurrence, ShiftCal};
pub use crate::sync::{RemoteCalendar, SyncMediator};
pub use crate::types::Pager;

pub use shiftcal_remote::{EventPayload, RemoteConfig, RemoteError, RemoteId};
