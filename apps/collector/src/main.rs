mod candidates;
mod config;
mod db;
mod errors;
mod overrides;
mod probes;
mod reconcile;
mod relevance;
mod report;
mod validation;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::probes::{HttpProber, ProbeClient};
use crate::relevance::RoleMatcher;

#[derive(Parser, Debug)]
#[command(
    name = "collector",
    about = "Collect and validate job data source companies against ATS vendor APIs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe candidate companies and emit an SQL patch for the new ones
    Collect(CollectArgs),
    /// Sample enabled company overrides and print a health summary
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct CollectArgs {
    /// MySQL connection string for the aggregator registry
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
    /// YAML file listing candidate companies per data source
    #[arg(long)]
    candidates_file: PathBuf,
    /// Output path for the generated SQL patch
    #[arg(long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Application configuration file containing the companyOverrides block
    #[arg(long, default_value = "application.yml")]
    config_file: PathBuf,
    /// Subset of company override keys to validate (default: all overrides)
    #[arg(long, num_args = 0..)]
    companies: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Collect(args) => match run_collect(args, &config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("collection failed: {err}");
                ExitCode::from(err.exit_code())
            }
        },
        Command::Validate(args) => run_validate(args, &config).await,
    }
}

async fn run_collect(args: CollectArgs, config: &Config) -> Result<(), AppError> {
    let pool = db::create_pool(&args.database_url).await?;
    let existing = db::load_existing_companies(&pool).await?;

    let candidates = candidates::load_candidates(&args.candidates_file)?;
    info!(count = candidates.len(), "Candidate companies loaded");

    let client = ProbeClient::new(Duration::from_secs(config.probe_timeout_secs));
    let prober = HttpProber::new(client, RoleMatcher::default());

    let accepted =
        reconcile::reconcile(&existing, &candidates, &prober, config.probe_concurrency).await;
    info!(
        accepted = accepted.len(),
        rejected = candidates.len() - accepted.len(),
        "Reconciliation finished"
    );

    report::write_insert_statements(&args.output, &accepted, Utc::now())
}

async fn run_validate(args: ValidateArgs, config: &Config) -> ExitCode {
    let client = ProbeClient::new(Duration::from_secs(config.probe_timeout_secs));

    let results = match validation::run(
        &args.config_file,
        &args.companies,
        &client,
        config.probe_concurrency,
    )
    .await
    {
        Ok(results) => results,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(err.exit_code());
        }
    };

    print!("{}", report::render_summary_table(&results));

    let failures = results.iter().filter(|r| !r.outcome.success).count();
    if failures > 0 {
        eprintln!("\n{failures} override(s) failed validation");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
