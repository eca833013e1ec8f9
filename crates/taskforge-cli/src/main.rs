//! TaskForge command line client.
//!
//! Run with: cargo run -p taskforge-cli -- solve --dataset SMALL
//! against a solver service listening on http://localhost:8080.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use taskforge_cli::{args, console, display};
use taskforge_client::{
    render, ApiError, HttpSolverApi, SessionController, SessionError, SessionEvent, SolverApi,
};
use taskforge_config::{ClientConfig, ConfigError};
use taskforge_core::{ConstraintKey, NewTask, Resource};
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "taskforge")]
#[command(about = "TaskForge - client for the task assignment solver service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(short, long, global = true, env = "TASKFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Solver service base URL, overrides the configuration file
    #[arg(long, global = true, env = "TASKFORGE_URL")]
    url: Option<String>,

    /// Poll interval in milliseconds while solving
    #[arg(long, global = true)]
    poll_ms: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip the banner
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the demo datasets offered by the service
    Datasets,
    /// List the solve jobs known to the service
    Jobs,
    /// Load a dataset, apply local edits and print it
    Show(DatasetArgs),
    /// Load a dataset and solve it, printing each update
    Solve {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Override a constraint weight, e.g. balance_load=0 (repeatable)
        #[arg(short, long = "weight", value_parser = args::parse_weight)]
        weights: Vec<(ConstraintKey, i32)>,
        /// Stop the job after this many seconds instead of waiting for it to finish
        #[arg(long)]
        time_limit: Option<u64>,
        /// Print a score analysis of the final solution
        #[arg(long)]
        analyze: bool,
    },
    /// Load a dataset and print its score analysis
    Analyze(DatasetArgs),
    /// Fetch a job by handle and print it
    Job {
        /// Job handle returned by a previous solve
        job_id: String,
        /// Request early termination instead of printing
        #[arg(long)]
        stop: bool,
    },
}

#[derive(Args)]
struct DatasetArgs {
    /// Dataset id, defaults to the configured one
    #[arg(short, long)]
    dataset: Option<String>,
    /// Add a resource as name:capacity[:skill,...] (repeatable)
    #[arg(long = "add-resource", value_parser = args::parse_resource)]
    add_resources: Vec<Resource>,
    /// Remove a resource by name (repeatable)
    #[arg(long = "remove-resource")]
    remove_resources: Vec<String>,
    /// Add a task as name:duration[:skill[:resource]] (repeatable)
    #[arg(long = "add-task", value_parser = args::parse_task)]
    add_tasks: Vec<NewTask>,
    /// Remove a task by id (repeatable)
    #[arg(long = "remove-task")]
    remove_tasks: Vec<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("no dataset given and none configured")]
    NoDataset,
}

type CliResult<T> = Result<T, CliError>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    console::init(cli.verbose, !cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".bright_red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = load_config(&cli)?;
    debug!(base_url = %config.base_url, poll_ms = config.poll_interval_ms, "Configuration loaded");

    match cli.command {
        Commands::Datasets => cmd_datasets(&config).await,
        Commands::Jobs => cmd_jobs(&config).await,
        Commands::Show(dataset) => cmd_show(&config, &dataset).await,
        Commands::Solve {
            dataset,
            weights,
            time_limit,
            analyze,
        } => cmd_solve(&config, &dataset, &weights, time_limit, analyze).await,
        Commands::Analyze(dataset) => cmd_analyze(&config, &dataset).await,
        Commands::Job { job_id, stop } => cmd_job(&config, &job_id, stop).await,
    }
}

fn load_config(cli: &Cli) -> CliResult<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::load("taskforge.toml").unwrap_or_default(),
    };
    if let Some(url) = &cli.url {
        config = config.with_base_url(url.clone());
    }
    if let Some(ms) = cli.poll_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    config.validate()?;
    Ok(config)
}

async fn cmd_datasets(config: &ClientConfig) -> CliResult<()> {
    let session = SessionController::from_config(config)?;
    for id in session.list_datasets().await? {
        println!("{}", id.bright_cyan());
    }
    Ok(())
}

async fn cmd_jobs(config: &ClientConfig) -> CliResult<()> {
    let session = SessionController::from_config(config)?;
    let jobs = session.list_jobs().await?;
    if jobs.is_empty() {
        println!("{}", "No jobs".bright_black());
    }
    for id in jobs {
        println!("{}", id.bright_cyan());
    }
    Ok(())
}

async fn cmd_show(config: &ClientConfig, dataset: &DatasetArgs) -> CliResult<()> {
    let session = load_session(config, dataset).await?;
    print_schedule(&session);
    Ok(())
}

async fn cmd_analyze(config: &ClientConfig, dataset: &DatasetArgs) -> CliResult<()> {
    let session = load_session(config, dataset).await?;
    let analysis = session.analyze().await?;
    println!("{}", display::analysis(&analysis));
    Ok(())
}

async fn cmd_job(config: &ClientConfig, job_id: &str, stop: bool) -> CliResult<()> {
    let api = HttpSolverApi::from_config(config)?;
    if stop {
        api.stop_solving(job_id).await?;
        info!(job_id = %job_id, "Termination requested");
        return Ok(());
    }
    let schedule = api.fetch_schedule(job_id).await?;
    let view = render(Some(&schedule), &config.constraint_weights());
    println!("{}", display::schedule(&view));
    Ok(())
}

async fn cmd_solve(
    config: &ClientConfig,
    dataset: &DatasetArgs,
    weights: &[(ConstraintKey, i32)],
    time_limit: Option<u64>,
    analyze: bool,
) -> CliResult<()> {
    let session = load_session(config, dataset).await?;
    for &(key, weight) in weights {
        session.set_weight(key, weight);
    }

    let mut events = session.subscribe();
    session.solve().await?;

    let deadline = async {
        match time_limit {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                info!("Time limit reached");
                session.stop().await?;
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                session.stop().await?;
                break;
            }
            event = events.recv() => match event {
                Ok(SessionEvent::ScheduleReplaced) => print_schedule(&session),
                Ok(SessionEvent::Notification(n)) => eprintln!("{}", display::notification(&n)),
                Ok(SessionEvent::StateChanged { solving: false, .. }) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Event stream lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    print_schedule(&session);
    if analyze {
        let analysis = session.analyze().await?;
        println!("{}", display::analysis(&analysis));
    }
    Ok(())
}

/// Creates a session, loads the requested dataset and applies local edits.
async fn load_session(
    config: &ClientConfig,
    dataset: &DatasetArgs,
) -> CliResult<SessionController> {
    let dataset_id = dataset
        .dataset
        .clone()
        .or_else(|| config.default_dataset.clone())
        .ok_or(CliError::NoDataset)?;

    let session = SessionController::from_config(config)?;
    let mut events = session.subscribe();
    session.select_dataset(&dataset_id).await?;

    for resource in &dataset.add_resources {
        session.add_resource(resource.clone())?;
    }
    for name in &dataset.remove_resources {
        session.remove_resource(name)?;
    }
    for task in &dataset.add_tasks {
        session.add_task(task.clone())?;
    }
    for id in &dataset.remove_tasks {
        session.remove_task(id)?;
    }

    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Notification(n) = event {
            eprintln!("{}", display::notification(&n));
        }
    }
    Ok(session)
}

fn print_schedule(session: &SessionController) {
    let weights = session.weights();
    let view = session.with_schedule(|schedule| render(schedule, &weights));
    println!("{}\n", display::schedule(&view));
}
