//! ordna - organize files into dated directories
//!
//! Files from one or more source trees are moved or copied into
//! `DEST/YYYY/MM_MonthName[/ext]/` according to their modification time.
//! A run is a three-stage pipeline:
//!
//! 1. [`discovery`] walks the sources and selects files by date range and filters
//! 2. [`planner`] computes each file's destination without any I/O
//! 3. [`applier`] moves/copies the files, or prints the plan under dry-run

pub mod applier;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod filters;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod planner;
pub mod report;
pub mod types;

pub use applier::{ApplyError, ApplyReport, Applier};
pub use cli::{Cli, RunSummary, run};
pub use config::{Config, ConfigError, DateRange};
pub use discovery::{Discovery, DiscoveryError, discover};
pub use filters::{CompiledFilters, FilterConfig};
pub use planner::{Collision, find_collisions, plan};
pub use types::{Action, FileRecord, PlanEntry, TransferMode};
