//! Report kinds shared by the formatters

/// What a report's elements represent, for the totals line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Found,
    Blocked,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Found => "Found",
            ReportKind::Blocked => "Blocked",
        }
    }
}
