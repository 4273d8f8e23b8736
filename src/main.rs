use clap::Parser;
use ordna::cli::{Cli, print_summary, run};
use ordna::logging;
use ordna::output::OutputFormatter;
use ordna::report::RunReport;
use std::io;
use std::process::ExitCode;

/// Bad arguments or configuration; nothing was touched.
const EXIT_USAGE: u8 = 2;
/// Discovery or apply failures.
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    logging::init(cli.verbose);

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if !config.dry_run {
        OutputFormatter::info(&format!(
            "Organizing {} source(s) into {}",
            config.sources.len(),
            config.destination.display()
        ));
    }

    let summary = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run(&config, &mut out)
    };

    if !config.dry_run {
        print_summary(&config, &summary);
    }

    if let Some(path) = &cli.report {
        if config.dry_run {
            OutputFormatter::warning("--report is ignored with --dry-run");
        } else if let Err(e) = RunReport::new(&config, &summary).save(path) {
            OutputFormatter::error(&e.to_string());
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILURE)
    }
}
