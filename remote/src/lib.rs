// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the mirrored external calendar.
//!
//! The provider is treated as an opaque remote event store: events can be
//! created, updated and deleted by id, and nothing more is assumed about it.

mod client;
mod config;
mod error;
mod http;
mod types;

pub use crate::client::RemoteClient;
pub use crate::config::{AuthMethod, RemoteConfig};
pub use crate::error::RemoteError;
pub use crate::types::{EventPayload, RemoteId};
