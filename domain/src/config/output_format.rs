//! Output format value object

use serde::{Deserialize, Serialize};

/// How batch results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table followed by totals and error lines (default)
    Table,
    /// JSON document with groups and errors
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}
