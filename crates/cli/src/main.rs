use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use nexus_fetcher::GitHubContentClient;
use nexus_protocol::HarvestReport;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

mod config;

#[derive(Parser)]
#[command(name = "nexus-harvester")]
#[command(about = "Harvest DBP activity metadata into search-index artifacts", long_about = None)]
#[command(version)]
struct Cli {
    /// Running without a subcommand harvests with the built-in source list.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch topic manifests, merge activities and write the artifacts
    Harvest(HarvestArgs),

    /// Print the effective source list in processing order
    Sources(SourcesArgs),
}

#[derive(Args, Default)]
struct HarvestArgs {
    /// JSON configuration file (defaults to the built-in source list)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the search-import file
    #[arg(long)]
    data_output_dir: Option<PathBuf>,

    /// Directory for the combined topic document
    #[arg(long)]
    topic_output_dir: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Fetch and merge but skip the artifact writes
    #[arg(long)]
    dry_run: bool,

    /// Print the harvest report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SourcesArgs {
    /// JSON configuration file (defaults to the built-in source list)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing when --json is used.
    let json_output = match &cli.command {
        Some(Commands::Harvest(args)) => args.json,
        Some(Commands::Sources(args)) => args.json,
        None => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Some(Commands::Harvest(args)) => run_harvest(args).await,
        Some(Commands::Sources(args)) => run_sources(args),
        None => run_harvest(HarvestArgs::default()).await,
    }
}

async fn run_harvest(args: HarvestArgs) -> Result<()> {
    let Some(token) = github_token() else {
        eprintln!("Error: GITHUB_TOKEN environment variable is not set");
        eprintln!("Please set your GitHub token first:");
        eprintln!("    export GITHUB_TOKEN=your_token_here");
        std::process::exit(1);
    };

    let mut config = config::load(args.config.as_deref())?;
    if let Some(dir) = args.data_output_dir {
        config.data_output_dir = dir;
    }
    if let Some(dir) = args.topic_output_dir {
        config.topic_output_dir = dir;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if args.dry_run {
        config.dry_run = true;
    }

    log::info!("starting harvest: {} sources", config.sources.len());

    let fetcher = GitHubContentClient::new(&token, Duration::from_millis(config.timeout_ms))
        .context("Failed to build GitHub client")?;

    let report = nexus_aggregator::run(&config, &fetcher)
        .await
        .context("Harvest failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        log_summary(&report);
    }

    Ok(())
}

fn run_sources(args: SourcesArgs) -> Result<()> {
    let config = config::load(args.config.as_deref())?;
    let sources = config.ordered_sources();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
    } else {
        for source in &sources {
            println!("{:>5}  {}", source.rank, source.url);
        }
    }

    Ok(())
}

fn github_token() -> Option<String> {
    env::var("GITHUB_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
}

fn log_summary(report: &HarvestReport) {
    log::info!(
        "sources: {}/{} fetched",
        report.sources_fetched,
        report.sources_total
    );
    for failure in &report.failures {
        log::warn!("source failed: {} ({})", failure.url, failure.message);
    }
    for warning in &report.locate_warnings {
        log::warn!(
            "activity dropped: {} (tried {})",
            warning.path,
            warning.attempted.join(", ")
        );
    }
    log::info!(
        "activities: {} discovered, {} resolved, {} dropped",
        report.activities_discovered,
        report.activities_resolved,
        report.locate_warnings.len()
    );
    if let Some(path) = &report.topic_artifact {
        log::info!("topic document written to {path}");
    }
    if let Some(path) = &report.search_artifact {
        log::info!("search import written to {path}");
    }
}
