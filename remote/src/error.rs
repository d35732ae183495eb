// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

/// Remote calendar client errors.
///
/// Callers care about one distinction: [`RemoteError::is_not_found`] marks the
/// permanent "object already gone" case, which a delete may treat as success;
/// everything else is a failure of this attempt and is retryable later.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport or server error (connection refused, 5xx, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Authentication was rejected by the provider.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The addressed remote object does not exist.
    #[error("remote object not found: {0}")]
    NotFound(String),

    /// The provider answered with something we could not interpret.
    #[error("invalid response from provider: {0}")]
    InvalidResponse(String),

    /// Client-side configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RemoteError {
    /// True for the permanent "object already gone" case.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True for failures that may succeed on a later attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e.to_string())
        }
    }
}
