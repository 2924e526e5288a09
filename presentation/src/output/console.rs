//! Console output formatter for user batch reports

use crate::output::formatter::ReportKind;
use colored::Colorize;
use fleetlab_application::BatchReport;
use fleetlab_domain::{HostError, User};

const HEADERS: [&str; 4] = ["COUNT", "USER", "HOSTS", "CACHED"];

/// Formats batch reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the table, the totals and then every host error.
    ///
    /// Error lines always come after the table so they never interleave
    /// with result rows.
    pub fn format(report: &BatchReport<User>, kind: ReportKind) -> String {
        let mut output = String::new();

        if !report.is_empty() {
            output.push_str(&Self::table(report));
            output.push('\n');
        }

        output.push_str(&format!(
            "{} {}\n",
            format!("{}:", kind.label()).cyan().bold(),
            report.found()
        ));
        let errors = format!("{}:", "Errors").bold();
        let errors = if report.errors.is_empty() {
            errors
        } else {
            errors.red()
        };
        output.push_str(&format!("{} {}\n", errors, report.error_count()));

        if !report.errors.is_empty() {
            output.push('\n');
            output.push_str(&Self::format_errors(&report.errors));
        }

        output
    }

    /// Format as JSON
    pub fn format_json(report: &BatchReport<User>) -> String {
        serde_json::to_string_pretty(&report.summary()).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line per failed host
    pub fn format_errors(errors: &[HostError]) -> String {
        errors
            .iter()
            .map(|e| format!("{} {}: {}\n", "x".red(), e.host.name.bold(), e.error))
            .collect()
    }

    /// Hosts a user was found on, one per line
    pub fn format_hosts(hosts: &[String]) -> String {
        hosts.iter().map(|h| format!("{}\n", h)).collect()
    }

    fn table(report: &BatchReport<User>) -> String {
        let rows: Vec<[String; 4]> = report
            .groups
            .iter()
            .map(|g| {
                [
                    format!("[{}]", g.count()),
                    g.key.clone(),
                    g.host_names().join(","),
                    format!("[{}]", g.cached_summary()),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        let header = Self::row(&HEADERS.map(String::from), &widths);
        output.push_str(&format!("{}\n", header.bold()));
        for row in &rows {
            output.push_str(&Self::row(row, &widths));
            output.push('\n');
        }
        output
    }

    fn row(cells: &[String; 4], widths: &[usize; 4]) -> String {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    }
}
