// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

/// Pagination with a limit and an offset.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    /// The maximum number of items to return. Negative means no limit
    /// (SQLite treats a negative `LIMIT` as unbounded).
    pub limit: i64,

    /// The number of items to skip before starting to collect the result set.
    pub offset: i64,
}

impl Pager {
    /// A pager that returns everything.
    #[must_use]
    pub const fn unbounded() -> Self {
        Pager {
            limit: -1,
            offset: 0,
        }
    }
}

impl From<(i64, i64)> for Pager {
    fn from((limit, offset): (i64, i64)) -> Self {
        Pager { limit, offset }
    }
}
