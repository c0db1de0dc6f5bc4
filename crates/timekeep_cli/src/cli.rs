use std::path::PathBuf;

use anyhow::Result;
use clap::{value_parser, Arg, ArgMatches, Command};
use timekeep_services::{ReportFormat, Settings};

/// What to report on.
#[derive(Debug, PartialEq)]
pub enum Action {
    /// One persisted timer.
    Show { file: PathBuf },
    /// One parallel run: a directory of per-worker files.
    Summary { dir: PathBuf },
    /// A sweep of parallel runs, one directory per worker count.
    Scaling { dirs: Vec<PathBuf> },
}

#[derive(Debug)]
pub struct Cli {
    pub action: Action,
    pub config: Option<PathBuf>,
    pub format: Option<ReportFormat>,
    pub precision: Option<usize>,
}

impl Cli {
    pub fn command() -> Command {
        Command::new("timekeep")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Aggregate per-worker timing files into run summaries and scaling tables")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                Arg::new("config")
                    .long("config")
                    .short('c')
                    .global(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("Settings file (JSON)"),
            )
            .arg(
                Arg::new("format")
                    .long("format")
                    .short('f')
                    .global(true)
                    .value_parser(["table", "json"])
                    .help("Output format"),
            )
            .arg(
                Arg::new("precision")
                    .long("precision")
                    .short('p')
                    .global(true)
                    .value_parser(value_parser!(usize))
                    .help("Decimal places for times and ratios"),
            )
            .subcommand(
                Command::new("show").about("Show one timer file").arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Timer record to load"),
                ),
            )
            .subcommand(
                Command::new("summary")
                    .about("Summarize the worker files of one parallel run")
                    .arg(
                        Arg::new("dir")
                            .required(true)
                            .value_parser(value_parser!(PathBuf))
                            .help("Directory holding one <prefix><worker id>.json per worker"),
                    ),
            )
            .subcommand(
                Command::new("scaling")
                    .about("Compute speed-up and efficiency across parallel runs")
                    .arg(
                        Arg::new("dirs")
                            .required(true)
                            .num_args(1..)
                            .value_parser(value_parser!(PathBuf))
                            .help("One directory per worker count, one of them single-worker"),
                    ),
            )
    }

    pub fn load() -> Result<Cli> {
        Self::from_matches(&Self::command().get_matches())
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Cli> {
        let action = match matches.subcommand() {
            Some(("show", sub)) => Action::Show {
                file: required_path(sub, "file")?,
            },
            Some(("summary", sub)) => Action::Summary {
                dir: required_path(sub, "dir")?,
            },
            Some(("scaling", sub)) => Action::Scaling {
                dirs: sub
                    .get_many::<PathBuf>("dirs")
                    .map(|dirs| dirs.cloned().collect())
                    .unwrap_or_default(),
            },
            other => anyhow::bail!("unsupported command: {:?}", other.map(|(name, _)| name)),
        };

        let format = matches
            .get_one::<String>("format")
            .map(|f| f.parse::<ReportFormat>())
            .transpose()?;

        Ok(Cli {
            action,
            config: matches.get_one::<PathBuf>("config").cloned(),
            format,
            precision: matches.get_one::<usize>("precision").copied(),
        })
    }

    /// Let command-line flags override the settings file.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(format) = self.format {
            settings.report.format = format;
        }
        if let Some(precision) = self.precision {
            settings.report.precision = precision;
        }
    }
}

fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf> {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing argument <{id}>"))
}
