use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use moodjournal::config::Config;
use moodjournal::effects::SubmitFailure;
use moodjournal::journal::{Action, AppState};
use moodjournal::logging::init_tracing;
use moodjournal::mood_service::MoodService;
use moodjournal::repository::HttpEntryRepository;
use moodjournal::shutdown::ShutdownCoordinator;
use moodjournal::JournalApp;

#[derive(Debug, Parser)]
#[command(name = "moodjournal", version, about = "Journal entries with predicted moods")]
struct Cli {
    /// Path to the config file (default: <config dir>/moodjournal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the mood service endpoint entries are submitted to
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read entries from stdin, one per line, and print them with their mood
    Write,
    /// Run the reference mood service
    Serve {
        /// Bind address (host:port), overrides service.bind_addr
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the journal in `write`, keep stderr quiet there.
    init_tracing(match cli.command {
        Command::Write => "warn",
        Command::Serve { .. } => "info",
    });

    let config = load_config(&cli)?;

    match cli.command {
        Command::Write => run_write(config).await,
        Command::Serve { bind } => run_serve(config, bind).await,
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(endpoint) = &cli.endpoint {
        config.repository.endpoint = endpoint.clone();
        config.validate()?;
    }

    Ok(config)
}

async fn run_write(config: Config) -> Result<()> {
    let repository =
        HttpEntryRepository::new(&config.repository).context("Failed to create entry repository")?;

    let report_failure = |failure: &SubmitFailure| {
        eprintln!("Could not save entry: {}", failure.error);
    };
    let journal = JournalApp::builder(Arc::new(repository))
        .with_failure_listener(Arc::new(report_failure))
        .build()
        .start();
    let handle = journal.handle();

    let printed = AtomicUsize::new(0);
    let subscription = handle.subscribe(move |state: &AppState| {
        let start = printed.swap(state.len(), Ordering::SeqCst);
        let mut stdout = std::io::stdout().lock();
        for entry in state.journal_entries().get(start..).unwrap_or_default() {
            let _ = writeln!(stdout, "{} | {} | {}", entry.time_created, entry.mood, entry.text);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut submitted = 0u64;
    let mut interrupted = false;

    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("Failed to read stdin")? {
                Some(text) => {
                    handle.dispatch(Action::submit(text))?;
                    submitted += 1;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                interrupted = true;
                break;
            }
        }
    }

    if !interrupted {
        tokio::select! {
            _ = journal.wait_resolved(submitted) => {}
            _ = tokio::signal::ctrl_c() => {}
        }
    }

    journal.shutdown().await;
    drop(subscription);
    Ok(())
}

async fn run_serve(config: Config, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or(config.service.bind_addr);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", bind))?;

    let service = MoodService::bind(addr)
        .await
        .with_context(|| format!("Failed to bind mood service to {}", addr))?;

    let shutdown = ShutdownCoordinator::new();
    let server = tokio::spawn(service.run(shutdown.handle()));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    shutdown.signal();

    server.await.context("Mood service task failed")??;
    Ok(())
}
