// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

mod cli;
mod cmd_event;
mod cmd_occurrences;
mod cmd_sync;
mod config;
mod util;

pub use crate::cli::{Cli, Commands, run};
