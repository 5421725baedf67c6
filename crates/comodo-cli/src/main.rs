//! Malice Comodo AntiVirus plugin.
//!
//! `comodo <file>` scans one file with Comodo's `cmdscan` and prints the
//! result as JSON (or a Markdown table with `--table`). `comodo update`
//! refreshes the signature database.

use anyhow::Context;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use comodo_cli::{render_json, render_markdown_table};
use comodo_core::{BuildInfo, ComodoConfig, LogLevel, ResultAssembler, ScanError, ScanReport};
use comodo_infra::{
    init_tracing, resolve_target, CmdScanInvoker, ScanPipeline, UpdateManager, UpdateOutcome,
    WebhookReporter,
};

#[derive(Parser)]
#[command(
    name = "comodo",
    about = "Malice Comodo AntiVirus Plugin",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Output as Markdown table
    #[arg(short, long)]
    table: bool,

    /// POST results to Malice webhook (MALICE_ENDPOINT)
    #[arg(short, long)]
    post: bool,

    /// Proxy settings for Malice webhook endpoint (MALICE_PROXY)
    #[arg(short = 'x', long)]
    proxy: bool,

    /// File to scan
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Update virus definitions
    #[command(visible_alias = "u")]
    Update,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let build = BuildInfo::from_build_env();
    let matches = Cli::command().version(build.version_string()).get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match err.downcast_ref::<ScanError>() {
                Some(scan_err) => {
                    log_scan_error(scan_err, "Comodo plugin failed");
                    scan_err.exit_code()
                }
                None => {
                    tracing::error!(code = "INTERNAL_ERROR", error = %err, "Comodo plugin failed");
                    1
                }
            };
            eprintln!("Error: {:#}", err);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ComodoConfig::from_env()?;

    match cli.command {
        Some(Commands::Update) => update(&config).await,
        None => scan(&cli, &config).await,
    }
}

async fn update(config: &ComodoConfig) -> anyhow::Result<()> {
    let manager = UpdateManager::new(config)?;
    match manager.update().await? {
        UpdateOutcome::Updated { date } => {
            tracing::info!(date = %date, "Comodo signatures updated");
        }
        UpdateOutcome::Skipped { reason } => {
            tracing::warn!(reason = %reason, "Comodo signatures not updated");
        }
    }
    Ok(())
}

async fn scan(cli: &Cli, config: &ComodoConfig) -> anyhow::Result<()> {
    let target = resolve_target(cli.path.as_deref().unwrap_or(Path::new("")))?;

    let pipeline = ScanPipeline::new(
        CmdScanInvoker::from_config(config),
        ResultAssembler::new(config.freshness_tracker()),
    );
    let report = pipeline.run(&target).await?;

    if cli.table {
        print!("{}", render_markdown_table(&report));
    } else {
        println!("{}", render_json(&report).context("Serialize report")?);
    }

    if cli.post {
        post_report(config, &report, &target, cli.proxy).await;
    }
    Ok(())
}

/// Best effort: delivery problems are logged, the local output stands.
async fn post_report(config: &ComodoConfig, report: &ScanReport, target: &Path, use_proxy: bool) {
    let delivered = match WebhookReporter::from_config(config, use_proxy) {
        Ok(reporter) => reporter.deliver(report, target).await,
        Err(e) => Err(e),
    };

    if let Err(e) = delivered {
        log_scan_error(&e, "Failed to deliver report to Malice webhook");
    }
}

fn log_scan_error(err: &ScanError, message: &str) {
    match err.log_level() {
        LogLevel::Warn => tracing::warn!(code = err.error_code(), error = %err, "{}", message),
        LogLevel::Error => tracing::error!(code = err.error_code(), error = %err, "{}", message),
    }
}
