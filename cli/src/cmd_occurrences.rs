// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use chrono::NaiveDate;
use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use shiftcal_core::{DateRange, ShiftCal};

use crate::util::parse_date;

#[derive(Debug, Clone)]
pub struct CmdOccurrences {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub owner: Option<String>,
}

impl CmdOccurrences {
    pub const NAME: &str = "occurrences";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("occ")
            .about("List concrete occurrences in a date range")
            .arg(arg!(--from <DATE> "First day of the range (YYYY-MM-DD)"))
            .arg(arg!(--to <DATE> "Last day of the range (YYYY-MM-DD)"))
            .arg(arg!(--owner [OWNER] "Only list occurrences of this owner"))
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            from: parse_date(matches.get_one::<String>("from").expect("from is required"))?,
            to: parse_date(matches.get_one::<String>("to").expect("to is required"))?,
            owner: matches.get_one::<String>("owner").cloned(),
        })
    }

    pub async fn run(self, cal: &ShiftCal) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing occurrences...");

        let range = DateRange::new(self.from, self.to);
        let occurrences = cal.list_occurrences(self.owner.as_deref(), range).await?;
        if occurrences.is_empty() {
            println!("{}", "No occurrences found".italic());
            return Ok(());
        }

        for occurrence in occurrences {
            let event = &occurrence.event;
            println!(
                "{}  {} {}-{}  {}  ({})",
                occurrence.date,
                event.kind,
                event.start_time.format("%H:%M"),
                event.end_time.format("%H:%M"),
                event.summary.bold(),
                event.owner,
            );
        }
        Ok(())
    }
}
