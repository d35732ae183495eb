// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use shiftcal_core::{EventId, ShiftCal};

#[derive(Debug, Clone)]
pub struct CmdSync {
    pub id: EventId,
}

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Push an event to the remote calendar")
            .arg(arg!(<ID> "Id of the event"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: EventId::from(
                matches
                    .get_one::<String>("ID")
                    .expect("ID is required")
                    .as_str(),
            ),
        }
    }

    pub async fn run(self, cal: &ShiftCal) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "syncing event...");
        cal.sync_event(&self.id).await?;
        println!("Synced event {}", self.id);
        Ok(())
    }
}
