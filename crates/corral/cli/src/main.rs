//! Corral CLI - run reconciliation passes from the terminal
//!
//! Loads a cluster fixture into the in-memory collaborators and runs one or
//! more passes over it, printing the aggregated outcome of each.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use corral_scheduler::{InMemoryControlPlane, SchedulerConfig, SchedulerHandler, SchedulerRegistry};
use corral_state::InMemoryEnvironmentRepository;
use corral_types::{SchedulerInput, SchedulerOutput};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod fixture;

use fixture::Fixture;

/// Corral CLI application
#[derive(Parser)]
#[command(name = "corralctl")]
#[command(about = "Corral - environment reconciliation", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CORRAL_CONFIG")]
    config: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    /// Log level
    #[arg(long, env = "CORRAL_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "CORRAL_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run reconciliation passes over a fixture
    Reconcile {
        /// Fixture file (JSON)
        #[arg(short, long)]
        fixture: PathBuf,

        /// Only reconcile this environment
        #[arg(short, long)]
        environment: Option<String>,

        /// Number of passes; each pass observes the previous one's changes
        #[arg(short, long, default_value_t = 1)]
        passes: u32,
    },

    /// List registered scheduling strategies
    Strategies,

    /// Show effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = SchedulerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Reconcile {
            fixture,
            environment,
            passes,
        } => reconcile(&fixture, environment.as_deref(), passes, config, cli.output).await,
        Commands::Strategies => {
            for key in SchedulerRegistry::with_defaults().keys() {
                println!("{}", key);
            }
            Ok(())
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn reconcile(
    path: &std::path::Path,
    only: Option<&str>,
    passes: u32,
    config: SchedulerConfig,
    output: OutputFormat,
) -> Result<()> {
    let fixture = Fixture::load(path)?;
    info!(
        fixture = %path.display(),
        cluster = %fixture.cluster_name,
        environments = fixture.environments.len(),
        instances = fixture.instances.len(),
        tasks = fixture.tasks.len(),
        "Fixture loaded"
    );

    let repository = Arc::new(InMemoryEnvironmentRepository::new());
    let control_plane = Arc::new(InMemoryControlPlane::new());
    fixture.seed(&repository, &control_plane)?;

    let handler = SchedulerHandler::new(
        repository,
        control_plane.clone(),
        Arc::new(SchedulerRegistry::with_defaults()),
        config,
    );

    let environment_ids = fixture.environment_ids(only);
    if environment_ids.is_empty() {
        anyhow::bail!("no matching environment in {}", path.display());
    }

    for pass in 1..=passes {
        debug!(pass, "Starting reconciliation pass");
        for environment_id in &environment_ids {
            let snapshot = control_plane.snapshot(&fixture.cluster_name);
            let result = handler
                .handle(SchedulerInput::new(snapshot, environment_id.clone()))
                .await?;
            print_output(pass, &result, output)?;
        }
    }

    Ok(())
}

fn print_output(pass: u32, result: &SchedulerOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!(
                "pass {} {}: {} succeeded, {} failed",
                pass, result.environment_id, result.successful_actions, result.failed_actions
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(result)?);
        }
    }
    Ok(())
}
