//! Presentation-level configuration
//!
//! Resolved output settings: CLI flags win over the `[output]` file section.

use fleetlab_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show the per-host progress bar
    pub show_progress: bool,
}

impl OutputConfig {
    /// Merge CLI overrides onto file values
    pub fn resolve(
        cli_format: Option<OutputFormat>,
        file_format: Option<OutputFormat>,
        color: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format.or(file_format).unwrap_or_default();
        Self {
            format,
            color,
            // Progress would corrupt machine-readable output.
            show_progress: !quiet && format == OutputFormat::Table,
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Apply the color setting to the terminal styling globally
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: true,
            show_progress: true,
        }
    }
}
