// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::Deref;

/// Identifier of an event on the remote calendar.
///
/// A `RemoteId` is opaque to shiftcal: the provider assigns it on creation and
/// it is only ever echoed back on update and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    /// Creates a new `RemoteId` from a string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for RemoteId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for RemoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RemoteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RemoteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Wire representation of an event sent to the provider.
///
/// Dates and times are plain strings in stable formats (`YYYY-MM-DD`,
/// `HH:MM`); the provider does its own interpretation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventPayload {
    /// Human-readable title of the event.
    pub summary: String,

    /// Event kind, `availability` or `unavailability`.
    pub kind: String,

    /// First calendar day of the event.
    pub start_date: String,

    /// Last calendar day, absent for open-ended series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Daily start time.
    pub start_time: String,

    /// Daily end time.
    pub end_time: String,
}
