mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use netbill_core::impls::{InMemoryRouter, InMemoryStore, TracingEventSink};
use netbill_core::ports::{Clock, SystemClock};
use netbill_core::{AppConfig, CronLoop, OrchestratorBuilder, StatusReport, TaskName, TaskOrchestrator};

#[derive(Debug, Parser)]
#[command(name = "netbill", about = "Maintenance tasks for the ISP billing dashboard")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one task now: block-unpaid-clients, sync-leases or check-payments.
    Run { task: TaskName },
    /// Run the unpaid-client block if today is the 20th.
    SimulateDay20,
    /// Show last-run times and task history.
    Status,
    /// Check the billing day on an interval until Ctrl-C.
    Watch,
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(&config.logging.level)
            .with_context(|| format!("invalid logging.level {:?}", config.logging.level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn build_orchestrator(config: &AppConfig) -> anyhow::Result<Arc<TaskOrchestrator>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    seed::seed_demo_data(&store, clock.today()).await;

    let router = Arc::new(InMemoryRouter::new(config.router.to_router_config(), store.clone()));
    let orchestrator = OrchestratorBuilder::new()
        .router(router)
        .persistence(store)
        .clock(clock)
        .event_sink(Arc::new(TracingEventSink))
        .history_capacity(config.orchestrator.history_capacity)
        .build()?;
    Ok(Arc::new(orchestrator))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading config")?;
    init_logging(&config)?;

    let orchestrator = build_orchestrator(&config).await?;

    match cli.command {
        Command::Run { task } => {
            let result = orchestrator.run(task).await;
            print_json(&result)?;
        }
        Command::SimulateDay20 => match orchestrator.simulate_day20_cron() {
            Some(handle) => {
                let result = handle.await.context("day 20 task panicked")?;
                print_json(&result)?;
            }
            None => println!("Not the 20th; nothing to do."),
        },
        Command::Status => {
            print_json(&StatusReport::collect(&orchestrator).await)?;
        }
        Command::Watch => {
            let trigger = config.orchestrator.trigger()?;
            let cron = CronLoop::spawn(
                orchestrator.clone(),
                trigger,
                config.orchestrator.poll_interval(),
            );
            tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
            info!("shutting down");
            cron.shutdown_and_join().await;
            print_json(&StatusReport::collect(&orchestrator).await)?;
        }
    }
    Ok(())
}
