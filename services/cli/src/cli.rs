use crate::demo::{run_demo, run_expire, run_import, DemoArgs, ExpireArgs, ImportArgs};
use clap::{Parser, Subcommand};
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "job-board",
    about = "Moderate, import, and expire job listings from the command line",
    version
)]
struct Cli {
    /// Override the configured log level (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed a sample board and walk it through the moderation workflow (default command)
    Demo(DemoArgs),
    /// Import job listings from a CSV export and summarize them by status
    Import(ImportArgs),
    /// Expire approved listings whose expiry date has passed
    Expire(ExpireArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(
        &config.telemetry,
        config.environment,
        cli.log_level.as_deref(),
    )?;
    debug!(?config.environment, "configuration loaded");

    let settings = config.workflow_settings();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Demo(args) => run_demo(args, settings),
        Command::Import(args) => run_import(args, settings),
        Command::Expire(args) => run_expire(args, settings),
    }
}
