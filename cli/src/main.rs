//! CLI entrypoint for fleetlab
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use fleetlab_application::{
    BatchReport, BlockUsersInput, BlockUsersUseCase, CacheMode, DispatchConfig,
    DispatchProgress, NoProgress, SearchUsersInput, SearchUsersUseCase,
};
use fleetlab_domain::{HostRegistry, User};
use fleetlab_infrastructure::{ConfigLoader, FileConfig, GitLabClient, HostFilter};
use fleetlab_presentation::{
    BlockArgs, Cli, Command, ConsoleFormatter, OutputConfig, ProgressReporter, ReportKind,
    SearchArgs, SimpleProgress, UsersCommand, block_question, confirm,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Everything a subcommand needs, resolved from config and flags
struct AppContext {
    client: Arc<GitLabClient>,
    registry: HostRegistry,
    dispatch: DispatchConfig,
    output: OutputConfig,
}

impl AppContext {
    fn progress(&self, label: &str) -> Arc<dyn DispatchProgress> {
        if !self.output.show_progress {
            Arc::new(NoProgress)
        } else if std::io::stderr().is_terminal() {
            Arc::new(ProgressReporter::new(label))
        } else {
            Arc::new(SimpleProgress::new(label))
        }
    }

    fn print(&self, report: &BatchReport<User>, kind: ReportKind) {
        if self.output.is_json() {
            println!("{}", ConsoleFormatter::format_json(report));
        } else {
            print!("{}", ConsoleFormatter::format(report, kind));
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting fleetlab");

    let Some(command) = &cli.command else {
        bail!("No command given. Try `fleetlab users search --help`.");
    };

    let config = load_config(&cli)?;
    let ctx = build_context(&cli, &config)?;

    match command {
        Command::Users { command } => match command {
            UsersCommand::Search(args) => search(&ctx, args).await,
            UsersCommand::Block(args) => block(&ctx, args).await,
        },
    }
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let loaded = if cli.no_config {
        match &cli.config {
            Some(path) => ConfigLoader::load_file(path),
            None => ConfigLoader::load_env(),
        }
    } else {
        ConfigLoader::load(cli.config.as_ref())
    };
    let config = loaded.map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("Config: {}", issue);
        }
        let listed: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
        bail!("Invalid configuration:\n{}", listed.join("\n"));
    }

    Ok(config)
}

fn build_context(cli: &Cli, config: &FileConfig) -> Result<AppContext> {
    let mut registry = config.to_registry()?;

    if let Some(pattern) = &cli.filter {
        let filter = HostFilter::new(pattern)
            .with_context(|| format!("Invalid --filter pattern '{}'", pattern))?;
        registry = filter.apply(registry);
        if registry.is_empty() {
            bail!("No configured host matches --filter '{}'", pattern);
        }
    }

    let mut dispatch = config.dispatch.to_dispatch_config();
    if let Some(max) = cli.max_in_flight {
        dispatch = dispatch.with_max_in_flight(max);
    }

    let output = OutputConfig::resolve(
        cli.output.map(Into::into),
        config.output.format,
        config.output.color,
        cli.quiet,
    );
    output.apply_color();

    // === Dependency Injection ===
    let client = Arc::new(GitLabClient::from_config(config)?);

    info!(
        "Using {} hosts: {}",
        registry.len(),
        registry.names().join(", ")
    );

    Ok(AppContext {
        client,
        registry,
        dispatch,
        output,
    })
}

async fn search(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let mut input = SearchUsersInput::new(args.lookup.by.into(), &args.lookup.value)
        .with_order(args.order.into())
        .with_cache(CacheMode::from_no_cache(args.no_cache));
    if let Some(field) = &args.group_by {
        input = input.with_group_by(field);
    }

    let use_case = SearchUsersUseCase::new(Arc::clone(&ctx.client), ctx.registry.clone())
        .with_dispatch(ctx.dispatch.clone())
        .with_progress(ctx.progress("Searching"));
    let report = use_case.execute(input).await?;

    ctx.print(&report, ReportKind::Found);
    Ok(())
}

async fn block(ctx: &AppContext, args: &BlockArgs) -> Result<()> {
    let use_case = BlockUsersUseCase::new(Arc::clone(&ctx.client), ctx.registry.clone())
        .with_dispatch(ctx.dispatch.clone())
        .with_lookup_progress(ctx.progress("Looking up"))
        .with_block_progress(ctx.progress("Blocking"));
    let input = BlockUsersInput::new(args.lookup.by.into(), &args.lookup.value);

    let targets = use_case.find_targets(&input).await?;
    let hosts = targets.host_names();

    if args.hosts {
        print!("{}", ConsoleFormatter::format_hosts(&hosts));
        if !targets.errors.is_empty() {
            eprint!("{}", ConsoleFormatter::format_errors(&targets.errors));
        }
        return Ok(());
    }

    if !args.yes && !confirm(&block_question(&args.lookup.value, &hosts))? {
        println!("Aborted.");
        return Ok(());
    }

    let report = use_case.block(targets).await?;
    ctx.print(&report, ReportKind::Blocked);
    Ok(())
}
