// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use chrono::{NaiveDate, NaiveTime, Weekday};

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate, Box<dyn Error>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{s}', expected YYYY-MM-DD").into())
}

/// Parse a time of day in `HH:MM` form.
pub fn parse_time(s: &str) -> Result<NaiveTime, Box<dyn Error>> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| format!("Invalid time '{s}', expected HH:MM").into())
}

/// Parse a comma-separated weekday list, e.g. `mon,wed,fri`.
pub fn parse_weekdays(s: &str) -> Result<Vec<Weekday>, Box<dyn Error>> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<Weekday>()
                .map_err(|_| format!("Invalid weekday '{t}'").into())
        })
        .collect()
}
