//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use fleetlab_domain::{GroupOrder, OutputFormat as DomainOutputFormat, UserField};
use std::path::PathBuf;

/// Output format for batch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table followed by totals and errors
    Table,
    /// JSON document with groups and errors
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => DomainOutputFormat::Table,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// Field a user is looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ByField {
    Email,
    Username,
    Name,
}

impl From<ByField> for UserField {
    fn from(by: ByField) -> Self {
        match by {
            ByField::Email => UserField::Email,
            ByField::Username => UserField::Username,
            ByField::Name => UserField::Name,
        }
    }
}

/// Order of result groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Ascending by group key
    Key,
    /// Largest groups first, ties by key
    Count,
}

impl From<OrderArg> for GroupOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Key => GroupOrder::KeyAscending,
            OrderArg::Count => GroupOrder::CountDescending,
        }
    }
}

/// CLI arguments for fleetlab
#[derive(Parser, Debug)]
#[command(name = "fleetlab")]
#[command(author, version, about = "Query and administer users across many GitLab instances")]
#[command(long_about = r#"
fleetlab sends one request to every configured GitLab host at once and
merges the answers into a single grouped table. Hosts that fail are listed
after the results; they never abort the batch.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./fleetlab.toml     Project-level config
3. ~/.config/fleetlab/config.toml   Global config

Environment variables prefixed FLEETLAB_ override file values
(nested keys use a double underscore, e.g. FLEETLAB_DISPATCH__MAX_IN_FLIGHT).

Example:
  fleetlab users search --by email bob@example.com
  fleetlab --filter '^prod-' users search --by name "Bob" --order count
  fleetlab users block --by username bob --hosts
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Only query hosts whose name matches this regex
    #[arg(long, value_name = "REGEX", global = true)]
    pub filter: Option<String>,

    /// Maximum host calls in flight at once (0 = unbounded)
    #[arg(long, value_name = "N", global = true)]
    pub max_in_flight: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for and administer user accounts
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// Find a user on every host
    Search(SearchArgs),
    /// Block a user on every host it exists on
    Block(BlockArgs),
}

/// Lookup key shared by every users subcommand
#[derive(Args, Debug, Clone)]
pub struct UserLookup {
    /// Field to search by
    #[arg(long, value_enum)]
    pub by: ByField,

    /// Value to search for
    pub value: String,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub lookup: UserLookup,

    /// Order of the result groups
    #[arg(long, value_enum, default_value = "key")]
    pub order: OrderArg,

    /// Group by this user field instead of the search field
    #[arg(long, value_name = "FIELD")]
    pub group_by: Option<String>,

    /// Ignore cached responses and query every host live
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BlockArgs {
    #[command(flatten)]
    pub lookup: UserLookup,

    /// Only print the hosts the user exists on, then stop
    #[arg(long)]
    pub hosts: bool,

    /// Block without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}
