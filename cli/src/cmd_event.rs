// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::num::NonZeroU32;

use chrono::{NaiveDate, NaiveTime, Weekday};
use clap::{ArgGroup, ArgMatches, Command, arg, value_parser};
use colored::Colorize;
use shiftcal_core::{
    DeleteOption, EventDraft, EventId, EventKind, Pager, Recurrence, ShiftCal,
};

use crate::util::{parse_date, parse_time, parse_weekdays};

#[derive(Debug, Clone)]
pub struct CmdEventNew {
    pub summary: String,
    pub kind: EventKind,
    pub owner: Option<String>,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub weekly: Option<Vec<Weekday>>,
    pub every_n_days: Option<NonZeroU32>,
}

impl CmdEventNew {
    pub const NAME: &str = "new";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("add")
            .about("Add a new event")
            .arg(arg!(<SUMMARY> "Event summary"))
            .arg(
                arg!(--kind [KIND] "Whether the event marks availability or unavailability")
                    .value_parser(value_parser!(EventKind))
                    .default_value("availability"),
            )
            .arg(arg!(--owner [OWNER] "Owner of the event, defaults to the configured owner"))
            .arg(arg!(--start <DATE> "First day of the event (YYYY-MM-DD)"))
            .arg(arg!(--end [DATE] "Last day of the event; omit for an open-ended series"))
            .arg(arg!(--"start-time" [TIME] "Daily start time (HH:MM)").default_value("09:00"))
            .arg(arg!(--"end-time" [TIME] "Daily end time (HH:MM)").default_value("17:00"))
            .arg(
                arg!(--weekly [DAYS] "Repeat weekly on these weekdays, e.g. mon,wed")
                    .conflicts_with("every-n-days"),
            )
            .arg(
                arg!(--"every-n-days" [N] "Repeat every N days, counted from the start date")
                    .value_parser(value_parser!(u32)),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let weekly = matches
            .get_one::<String>("weekly")
            .map(|s| parse_weekdays(s))
            .transpose()?;
        let every_n_days = matches
            .get_one::<u32>("every-n-days")
            .map(|n| NonZeroU32::new(*n).ok_or("--every-n-days must be at least 1"))
            .transpose()?;

        Ok(Self {
            summary: matches
                .get_one::<String>("SUMMARY")
                .expect("SUMMARY is required")
                .clone(),
            kind: *matches.get_one::<EventKind>("kind").expect("has default"),
            owner: matches.get_one::<String>("owner").cloned(),
            start: parse_date(matches.get_one::<String>("start").expect("start is required"))?,
            end: matches
                .get_one::<String>("end")
                .map(|s| parse_date(s))
                .transpose()?,
            start_time: parse_time(matches.get_one::<String>("start-time").expect("has default"))?,
            end_time: parse_time(matches.get_one::<String>("end-time").expect("has default"))?,
            weekly,
            every_n_days,
        })
    }

    pub async fn run(self, cal: &ShiftCal) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "adding new event...");

        let owner = match self.owner.or_else(|| cal.default_owner().map(String::from)) {
            Some(owner) => owner,
            None => return Err("No owner given and no default_owner configured".into()),
        };

        let recurrence = match (self.weekly, self.every_n_days) {
            (Some(days), _) => Some(Recurrence::weekly(days)),
            (None, Some(n)) => Some(Recurrence::EveryNDays(n)),
            (None, None) => None,
        };

        let draft = EventDraft {
            summary: self.summary,
            kind: self.kind,
            owner,
            start_date: self.start,
            end_date: self.end,
            start_time: self.start_time,
            end_time: self.end_time,
            recurrence,
        };
        let event = cal.create_event(draft).await?;
        println!("Created event {}: {}", event.id, event.summary.bold());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventList {
    pub owner: Option<String>,
}

impl CmdEventList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List events")
            .arg(arg!(--owner [OWNER] "Only list events of this owner"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            owner: matches.get_one::<String>("owner").cloned(),
        }
    }

    pub async fn run(self, cal: &ShiftCal) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing events...");
        const MAX: i64 = 128;

        let pager: Pager = (MAX, 0).into();
        let events = cal.list_events(self.owner.as_deref(), &pager).await?;
        if events.len() >= (MAX as usize) {
            let total = cal.count_events(self.owner.as_deref()).await?;
            if total > MAX {
                let prompt = format!("Displaying the {MAX}/{total} events");
                println!("{}", prompt.italic());
            }
        } else if events.is_empty() {
            println!("{}", "No events found".italic());
            return Ok(());
        }

        for event in events {
            let span = match event.end_date {
                Some(end) if end != event.start_date => {
                    format!("{} .. {}", event.start_date, end)
                }
                Some(_) => event.start_date.to_string(),
                None => format!("{} ..", event.start_date),
            };
            let recurrence = match &event.recurrence {
                Some(rule) => format!(" [{rule}]"),
                None => String::new(),
            };
            println!(
                "{}  {}  {} {}-{}{}  {} ({})",
                event.id,
                span,
                event.kind,
                event.start_time.format("%H:%M"),
                event.end_time.format("%H:%M"),
                recurrence,
                event.summary.bold(),
                event.sync_status,
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventDelete {
    pub id: EventId,
    pub option: DeleteOption,
    pub date: Option<NaiveDate>,
}

impl CmdEventDelete {
    pub const NAME: &str = "delete";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete an event, entirely or for a single day")
            .arg(arg!(<ID> "Id of the event"))
            .arg(arg!(--all "Delete the event and all of its occurrences"))
            .arg(arg!(--day [DATE] "Skip only the occurrence on this day (YYYY-MM-DD)"))
            .group(
                ArgGroup::new("scope")
                    .args(["all", "day"])
                    .required(true)
                    .multiple(false),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let id = EventId::from(
            matches
                .get_one::<String>("ID")
                .expect("ID is required")
                .as_str(),
        );
        if matches.get_flag("all") {
            Ok(Self {
                id,
                option: DeleteOption::AllOccurrences,
                date: None,
            })
        } else {
            let date = matches.get_one::<String>("day").expect("in scope group");
            Ok(Self {
                id,
                option: DeleteOption::ThisDay,
                date: Some(parse_date(date)?),
            })
        }
    }

    pub async fn run(self, cal: &ShiftCal) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "deleting event...");
        let outcome = cal.request_delete(&self.id, self.option, self.date).await?;
        println!("{}", outcome.message());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventRestore {
    pub id: EventId,
    pub date: NaiveDate,
}

impl CmdEventRestore {
    pub const NAME: &str = "restore";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Restore a previously skipped occurrence")
            .arg(arg!(<ID> "Id of the event"))
            .arg(arg!(--day <DATE> "The day to restore (YYYY-MM-DD)"))
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            id: EventId::from(
                matches
                    .get_one::<String>("ID")
                    .expect("ID is required")
                    .as_str(),
            ),
            date: parse_date(matches.get_one::<String>("day").expect("day is required"))?,
        })
    }

    pub async fn run(self, cal: &ShiftCal) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "restoring occurrence...");
        cal.remove_exception(&self.id, self.date).await?;
        println!("Restored the occurrence on {}", self.date);
        Ok(())
    }
}
