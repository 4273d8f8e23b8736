//! Output formatting and styling module.
//!
//! All user-facing terminal output goes through [`OutputFormatter`]. Errors
//! and warnings go to stderr so that dry-run stdout carries nothing but the
//! `source -> destination` lines.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Writes all user-facing terminal output with consistent styling.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗, stderr)
/// - Warning messages (yellow with ⚠, stderr)
/// - Info messages (cyan)
/// - The apply-phase progress bar
/// - The per-bucket summary table
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ordna::output::OutputFormatter;
    /// OutputFormatter::success("Organized 12 files into /media/photos");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, on stderr.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ordna::output::OutputFormatter;
    /// OutputFormatter::error("failed to copy a.jpg to dest/2023/03_March/a.jpg");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol, on stderr.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ordna::output::OutputFormatter;
    /// OutputFormatter::warning("2 sources map to dest/2023/03_March/a.jpg");
    /// ```
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ordna::output::OutputFormatter;
    /// OutputFormatter::info("Organizing 1 source(s) into /media/photos");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    ///
    /// # Arguments
    ///
    /// * `header` - The header text
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates the progress bar for the apply phase. It draws on stderr and
    /// stays hidden when stderr is not a terminal.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of plan entries to apply
    ///
    /// # Returns
    ///
    /// A configured `ProgressBar` ready for use.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ordna::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// Prints a table of file counts per destination bucket.
    ///
    /// # Arguments
    ///
    /// * `bucket_counts` - Applied files per bucket label (`2023/03_March[/jpg]`)
    /// * `total_files` - Total number of applied files
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ordna::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("2023/03_March".to_string(), 15);
    /// counts.insert("2023/07_July".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(bucket_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = bucket_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // "Bucket"

        println!("{:<width$} | {}", "Bucket".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));

        for (bucket, count) in bucket_counts {
            println!(
                "{:<width$} | {} {}",
                bucket,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
