//! Output Formatting - Table, JSON, and plain text output
//!
//! This module provides consistent output formatting across all CLI commands
//! with support for tables, JSON, and plain text.

use std::io;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use crate::triage::AppFinding;

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format (default for interactive use)
    #[default]
    Table,
    /// JSON output for machine processing
    Json,
    /// Plain text output, one triage point per line
    Plain,
}

/// Output writer that handles formatting based on configuration
pub struct OutputWriter {
    format: OutputFormat,
    quiet: bool,
    verbose: bool,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {}", style("✓").green().bold(), style(message).green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow().bold(), message);
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {}", style("ℹ").cyan().bold(), message);
    }

    /// Print a debug message (only in verbose mode)
    pub fn debug(&self, message: &str) {
        if !self.verbose {
            return;
        }
        println!("{} {}", style("⋯").dim(), style(message).dim());
    }

    /// Print a section divider
    pub fn divider(&self) {
        if self.quiet || self.format == OutputFormat::Json {
            return;
        }
        println!("{}", style("─".repeat(50)).dim());
    }

    /// Print a header/title with styled formatting
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Table => {
                self.divider();
                println!("  {}", style(title).bold().cyan());
                self.divider();
            }
            OutputFormat::Plain => println!("{}", title),
            OutputFormat::Json => {}
        }
    }

    /// Print a report section title in warning colour
    pub fn section(&self, title: &str) {
        if self.quiet {
            return;
        }
        println!("{}", style(title).yellow().bold());
    }

    /// Print a report line in alert colour
    pub fn alert(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{}", style(message).red());
    }

    /// Print raw output (respects quiet mode)
    pub fn print(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{}", message);
    }

    /// Print JSON output (always prints, ignores quiet)
    pub fn json<T: Serialize + ?Sized>(&self, data: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        println!("{}", json);
        Ok(())
    }

    /// Print a table
    pub fn table(&self, table: &Table) {
        if self.quiet {
            return;
        }
        println!("{}", table);
    }

    /// Create a new styled table
    pub fn create_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    /// Create a table with headers
    pub fn create_table_with_headers(&self, headers: &[&str]) -> Table {
        let mut table = self.create_table();
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
        table
    }

    /// Print app triage points as a table
    pub fn findings_table(&self, findings: &[AppFinding]) {
        let mut table = self.create_table_with_headers(&["Instance", "Triage point"]);

        for finding in findings {
            table.add_row(vec![
                Cell::new(
                    finding
                        .instance
                        .map(|i| format!("#{}", i))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(finding.report_line()).fg(Color::Red),
            ]);
        }

        self.table(&table);
    }
}

/// Progress indicator for long-running operations
pub struct ProgressIndicator {
    bar: indicatif::ProgressBar,
}

impl ProgressIndicator {
    /// Create a new spinner progress indicator
    pub fn spinner(message: &str) -> Self {
        let bar = indicatif::ProgressBar::new_spinner();
        bar.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Valid template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    /// Finish and clear
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::FindingKind;

    #[test]
    fn test_output_writer_creation() {
        let writer = OutputWriter::new(OutputFormat::Json, false, true);
        assert_eq!(writer.format(), OutputFormat::Json);
        assert!(!writer.is_quiet());
    }

    #[test]
    fn test_table_with_headers() {
        let writer = OutputWriter::new(OutputFormat::Table, true, false);
        let mut table = writer.create_table_with_headers(&["Instance", "Triage point"]);
        table.add_row(vec!["#0", "web <---> CPU usage over 85 percent!"]);
        let rendered = table.to_string();
        assert!(rendered.contains("Triage point"));
        assert!(rendered.contains("web <---> CPU usage"));

        // quiet mode swallows the table without panicking
        writer.findings_table(&[AppFinding::new("web", Some(0), FindingKind::NoRoute)]);
    }
}
