//! Command-line interface module for smartsort.
//!
//! This module handles:
//! - Argument parsing (clap)
//! - Logging setup
//! - Rule loading
//! - Single runs and interval runs of the organizer

use crate::config::load_rules;
use crate::file_organizer::{FileOrganizer, OrganizeError, PassReport};
use crate::logging::{LogLevel, default_log_path, init_tracing};
use crate::output;
use crate::reporter::TracingReporter;
use crate::rules::RuleTable;
use crate::schedule::{Scheduler, Shutdown};
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Sort the files of a directory into category subfolders by extension.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Directory to organize. Defaults to ~/Downloads.
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Rule file (.json, .yaml, .yml or .toml). Defaults to the built-in rules.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Re-run every N minutes. 0 performs a single run.
    #[arg(long, value_name = "MINUTES", default_value_t = 0)]
    pub interval: u64,

    /// Log verbosity.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Append logs to this file instead of the default location.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath, conflicts_with = "no_log_file")]
    pub log_file: Option<PathBuf>,

    /// Log to stdout only.
    #[arg(long)]
    pub no_log_file: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json: bool,

    /// Report what would be moved without touching any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Print a per-category table after a single run.
    #[arg(long)]
    pub summary: bool,
}

impl Args {
    /// The directory to organize: `--path`, or `~/Downloads`.
    pub fn source_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(p) => Ok(p.clone()),
            None => dirs::home_dir()
                .map(|home| home.join("Downloads"))
                .context("no --path given and the home directory is unknown"),
        }
    }

    /// Where file logs go, if anywhere.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        if self.no_log_file {
            return None;
        }
        match &self.log_file {
            Some(p) => Some(p.clone()),
            None => default_log_path().ok(),
        }
    }
}

/// Parse process arguments.
pub fn parse() -> Args {
    Args::parse()
}

/// Runs the application with parsed arguments.
///
/// A single run against an invalid source directory fails; in interval mode
/// such a run is only logged and the next one is attempted on schedule.
pub fn run(args: Args) -> Result<()> {
    let log_file = args.log_file_path();
    // Held until return so the file appender flushes.
    let _guard = init_tracing(args.log_level, log_file.as_deref(), args.json)
        .inspect_err(|e| output::error(&format!("Failed to initialize logging: {e:#}")))?;

    let source = args.source_path()?;

    let rules = match load_rules(args.config.as_deref()) {
        Ok(rules) => rules,
        Err(e) => {
            error!("Configuration error: {}", e);
            bail!("Configuration error: {}", e);
        }
    };
    let table = RuleTable::new(&rules);
    debug!("Categories in order: {}", table.categories().join(", "));
    let organizer = FileOrganizer::new(table).dry_run(args.dry_run);

    if args.interval > 0 {
        info!(
            "Scheduling file organization to run every {} minutes in {}",
            args.interval,
            source.display()
        );

        let shutdown = Shutdown::new();
        {
            let shutdown = shutdown.clone();
            ctrlc::set_handler(move || shutdown.request())
                .context("failed to install signal handler")?;
        }

        let scheduler = Scheduler::every_minutes(args.interval);
        debug!("Next run in {:?}", scheduler.interval());
        let runs = scheduler.run(&shutdown, || {
            // Already logged by the organizer; keep the schedule going.
            let _ = run_job(&organizer, &source);
        });
        info!("Stopped after {} scheduled runs", runs);
        return Ok(());
    }

    info!(
        "Performing a single file organization run for path: {}",
        source.display()
    );
    let report = run_job(&organizer, &source)?;
    if report.failed > 0 {
        warn!("{} files could not be moved", report.failed);
    }
    if args.summary {
        output::summary_table(&report, args.dry_run);
    }
    Ok(())
}

fn run_job(organizer: &FileOrganizer, source: &Path) -> Result<PassReport, OrganizeError> {
    info!(
        "Running file organization job for path: {}",
        source.display()
    );
    organizer.organize(source, &TracingReporter)
}
