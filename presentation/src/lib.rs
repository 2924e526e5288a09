//! Presentation layer for fleetlab
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the confirmation prompt.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    BlockArgs, ByField, Cli, Command, OrderArg, OutputFormat, SearchArgs, UserLookup,
    UsersCommand,
};
pub use cli::prompt::{block_question, confirm};
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
pub use output::formatter::ReportKind;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
