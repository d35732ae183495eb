// SPDX-FileCopyrightText: 2025-2026 shiftcal contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::BoxFuture};
use shiftcal_core::{APP_NAME, ShiftCal};
use tracing_subscriber::EnvFilter;

use crate::cmd_event::{CmdEventDelete, CmdEventList, CmdEventNew, CmdEventRestore};
use crate::cmd_occurrences::CmdOccurrences;
use crate::cmd_sync::CmdSync;
use crate::config::parse_config;

/// Run the shiftcal command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    };
    Ok(())
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Recurring availability calendar for field technicians")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/shiftcal/config.toml on Linux and \
MacOS, %LOCALAPPDATA%/shiftcal/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(
                Command::new("event")
                    .alias("e")
                    .about("Manage your events")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdEventNew::command())
                    .subcommand(CmdEventList::command())
                    .subcommand(CmdEventDelete::command())
                    .subcommand(CmdEventRestore::command()),
            )
            .subcommand(CmdOccurrences::command())
            .subcommand(CmdSync::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some(("event", matches)) => match matches.subcommand() {
                Some((CmdEventNew::NAME, matches)) => EventNew(CmdEventNew::from(matches)?),
                Some((CmdEventList::NAME, matches)) => EventList(CmdEventList::from(matches)),
                Some((CmdEventDelete::NAME, matches)) => {
                    EventDelete(CmdEventDelete::from(matches)?)
                }
                Some((CmdEventRestore::NAME, matches)) => {
                    EventRestore(CmdEventRestore::from(matches)?)
                }
                _ => unreachable!(),
            },
            Some((CmdOccurrences::NAME, matches)) => Occurrences(CmdOccurrences::from(matches)?),
            Some((CmdSync::NAME, matches)) => Sync(CmdSync::from(matches)),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Add a new event
    EventNew(CmdEventNew),

    /// List events
    EventList(CmdEventList),

    /// Delete an event or one of its occurrences
    EventDelete(CmdEventDelete),

    /// Restore a previously skipped occurrence
    EventRestore(CmdEventRestore),

    /// List concrete occurrences in a date range
    Occurrences(CmdOccurrences),

    /// Push an event to the remote calendar
    Sync(CmdSync),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            EventNew(a)     => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventList(a)    => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventDelete(a)  => Self::run_with(config, |x| a.run(x).boxed()).await,
            EventRestore(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            Occurrences(a)  => Self::run_with(config, |x| a.run(x).boxed()).await,
            Sync(a)         => Self::run_with(config, |x| a.run(x).boxed()).await,
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a ShiftCal) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration");
        let config = parse_config(config).await?;
        let cal = ShiftCal::new(config).await?;

        f(&cal).await?;

        cal.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shiftcal_core::{DeleteOption, EventKind};

    use super::*;

    #[test]
    fn test_parse_config() {
        let args = vec!["test", "-c", "/tmp/config.toml", "event", "list"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
        assert!(matches!(cli.command, Commands::EventList(_)));
    }

    #[test]
    fn test_parse_event_new() {
        let args = vec![
            "test",
            "event",
            "new",
            "Unavailable Mondays",
            "--kind",
            "unavailability",
            "--start",
            "2025-01-06",
            "--end",
            "2025-03-31",
            "--start-time",
            "09:00",
            "--end-time",
            "17:00",
            "--weekly",
            "mon",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::EventNew(cmd) => {
                assert_eq!(cmd.summary, "Unavailable Mondays");
                assert_eq!(cmd.kind, EventKind::Unavailability);
                assert_eq!(cmd.start, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
                assert!(cmd.weekly.is_some());
            }
            _ => panic!("Expected EventNew command"),
        }
    }

    #[test]
    fn test_parse_event_new_rejects_conflicting_recurrence() {
        let args = vec![
            "test",
            "event",
            "new",
            "Some event",
            "--start",
            "2025-01-06",
            "--weekly",
            "mon",
            "--every-n-days",
            "3",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_event_list() {
        let args = vec!["test", "event", "list", "--owner", "tech-1"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::EventList(cmd) => {
                assert_eq!(cmd.owner.as_deref(), Some("tech-1"));
            }
            _ => panic!("Expected EventList command"),
        }
    }

    #[test]
    fn test_parse_event_delete_all() {
        let args = vec!["test", "event", "delete", "event-1", "--all"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::EventDelete(cmd) => {
                assert_eq!(cmd.option, DeleteOption::AllOccurrences);
                assert_eq!(cmd.date, None);
            }
            _ => panic!("Expected EventDelete command"),
        }
    }

    #[test]
    fn test_parse_event_delete_this_day() {
        let args = vec!["test", "event", "delete", "event-1", "--day", "2025-02-03"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::EventDelete(cmd) => {
                assert_eq!(cmd.option, DeleteOption::ThisDay);
                assert_eq!(cmd.date, NaiveDate::from_ymd_opt(2025, 2, 3));
            }
            _ => panic!("Expected EventDelete command"),
        }
    }

    #[test]
    fn test_parse_event_delete_requires_a_scope() {
        let args = vec!["test", "event", "delete", "event-1"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_event_delete_rejects_both_scopes() {
        let args = vec![
            "test", "event", "delete", "event-1", "--all", "--day", "2025-02-03",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_event_restore() {
        let args = vec!["test", "event", "restore", "event-1", "--day", "2025-02-03"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::EventRestore(cmd) => {
                assert_eq!(cmd.date, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
            }
            _ => panic!("Expected EventRestore command"),
        }
    }

    #[test]
    fn test_parse_occurrences() {
        let args = vec![
            "test",
            "occurrences",
            "--from",
            "2025-01-01",
            "--to",
            "2025-03-31",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Occurrences(cmd) => {
                assert_eq!(cmd.from, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
                assert_eq!(cmd.to, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
            }
            _ => panic!("Expected Occurrences command"),
        }
    }

    #[test]
    fn test_parse_sync() {
        let cli = Cli::try_parse_from(vec!["test", "sync", "event-1"]).unwrap();
        match cli.command {
            Commands::Sync(cmd) => assert_eq!(cmd.id.as_str(), "event-1"),
            _ => panic!("Expected Sync command"),
        }
    }
}
