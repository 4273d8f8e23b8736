//! Command-line interface module for ordna.
//!
//! This module handles:
//! - Argument parsing and validation into a [`Config`]
//! - Orchestration of discovery, planning and application
//! - Reporting of per-file failures and the final summary

use crate::applier::{ApplyReport, Applier};
use crate::config::{Config, ConfigError, DateRange, mode_from_flags, parse_date};
use crate::discovery::{Discovery, discover};
use crate::filters::FilterConfig;
use crate::output::OutputFormatter;
use crate::planner::{self, Collision, bucket_label, find_collisions};
use crate::types::PlanEntry;
use chrono::NaiveDate;
use clap::{ArgAction, ArgGroup, Parser};
use log::info;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

/// Organize files into YYYY/MM_Month directories by modification date.
#[derive(Debug, Parser)]
#[command(name = "ordna", version, about)]
#[command(override_usage = "ordna <-m|-c> [OPTIONS] <SOURCE>... <DEST>")]
#[command(group(ArgGroup::new("mode").required(true).args(["move_files", "copy_files"])))]
pub struct Cli {
    /// Move files (rename, falling back to copy + delete)
    #[arg(short = 'm', long = "move")]
    pub move_files: bool,

    /// Copy files, leaving the sources untouched
    #[arg(short = 'c', long = "copy")]
    pub copy_files: bool,

    /// Only files modified on or after this day
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Only files modified on or before this day (inclusive through 23:59:59)
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Additionally bucket by lower-cased file extension
    #[arg(long = "ext")]
    pub group_by_extension: bool,

    /// Print planned `source -> destination` lines without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Filter configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a JSON report of the run to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// One or more sources followed by the destination
    #[arg(value_name = "SOURCE... DEST", required = true, num_args = 2..)]
    pub paths: Vec<PathBuf>,
}

impl Cli {
    /// Validates the parsed arguments and loads the filter configuration.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mode = mode_from_flags(self.move_files, self.copy_files)?;
        let (destination, sources) = self
            .paths
            .split_last()
            .ok_or(ConfigError::MissingSources)?;
        let date_range = DateRange::new(self.from, self.to)?;
        let filters = FilterConfig::load(self.config.as_deref())?.compile()?;

        Ok(Config::new(mode, sources.to_vec(), destination.clone())?
            .with_date_range(date_range)
            .group_by_extension(self.group_by_extension)
            .dry_run(self.dry_run)
            .with_filters(filters))
    }
}

/// Everything a run produced, stage by stage.
#[derive(Debug)]
pub struct RunSummary {
    pub discovery: Discovery,
    pub plan: Vec<PlanEntry>,
    pub collisions: Vec<Collision>,
    pub report: ApplyReport,
}

impl RunSummary {
    /// No discovery errors and no unapplied entries. Partial moves only warn.
    pub fn is_success(&self) -> bool {
        self.discovery.errors.is_empty() && !self.report.has_errors()
    }

    /// One-line account of what discovery selected.
    pub fn discovery_line(&self) -> String {
        let files = self.discovery.records.len();
        let bytes = self.discovery.total_bytes();
        format!(
            "Discovered {} file{}, {} byte{}",
            files,
            if files == 1 { "" } else { "s" },
            bytes,
            if bytes == 1 { "" } else { "s" }
        )
    }

    /// Number of applied entries per destination bucket.
    pub fn bucket_counts(&self, config: &Config) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for applied in &self.report.applied {
            *counts
                .entry(bucket_label(&config.destination, &applied.entry))
                .or_insert(0) += 1;
        }
        counts
    }
}

/// Runs discovery, planning and application for `config`.
///
/// Dry-run lines go to `out`; failures and warnings go to stderr as they are
/// found and are also returned in the summary.
pub fn run(config: &Config, out: &mut dyn Write) -> RunSummary {
    let discovery = discover(config);
    for error in &discovery.errors {
        OutputFormatter::error(&error.to_string());
    }
    info!(
        "discovered {} file(s), {} bytes",
        discovery.records.len(),
        discovery.total_bytes()
    );

    let plan = planner::plan(config, &discovery.records);
    let collisions = find_collisions(&plan);
    for collision in &collisions {
        OutputFormatter::warning(&format!(
            "{} sources map to {}; the last one ({}) wins",
            collision.sources.len(),
            collision.destination_path.display(),
            collision
                .winner()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        ));
    }

    let applier = if config.dry_run {
        Applier::new(config)
    } else {
        Applier::new(config).with_progress(OutputFormatter::create_progress_bar(plan.len() as u64))
    };
    let report = applier.apply(&plan, out);

    for error in report.errors() {
        OutputFormatter::error(&error.to_string());
    }
    for warning in report.warnings() {
        OutputFormatter::warning(&warning.to_string());
    }

    RunSummary {
        discovery,
        plan,
        collisions,
        report,
    }
}

/// Prints the closing summary of a live run.
pub fn print_summary(config: &Config, summary: &RunSummary) {
    let applied = summary.report.applied.len();
    OutputFormatter::info(&summary.discovery_line());
    OutputFormatter::summary_table(&summary.bucket_counts(config), applied);

    let failed = summary.report.errors().count() + summary.discovery.errors.len();
    if failed == 0 {
        OutputFormatter::success(&format!(
            "Organized {} file(s) into {}",
            applied,
            config.destination.display()
        ));
    } else {
        OutputFormatter::error(&format!(
            "{} problem(s) occurred. Please review the errors above.",
            failed
        ));
    }
}
