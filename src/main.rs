mod animation;
mod app;
mod config;
mod demo;
mod error;
mod event;
mod input;
mod render;
mod services;
mod state;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use config::{AppConfig, Endpoints, SourceKind, DEFAULT_CONTROL_URL, DEFAULT_DATABASE_URL, DEFAULT_GALLERY_URL};
use error::{AtelierError, Result};
use services::commission::{
    CommissionFlow, CommissionStep, FirebaseCommissionStore, PresignedPayment, Tier, DEFAULT_TIER,
};
use services::{fetch_gallery, http_client, ControlAction, ControlClient, NoticeLevel};

/// Atelier: watch an autonomous AI art studio at work
///
/// Six agents share an office: they conceive, paint, curate, publish, promote
/// and analyze each drop. Their status streams in live, activity drips into a
/// chat feed at a readable pace, and past drops fill the gallery.
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Follow the studio's realtime database
    #[arg(long, conflicts_with_all = ["file", "demo"])]
    stream: bool,

    /// Path to a snapshot file to tail (JSON lines, one office state per line)
    #[arg(short, long, value_name = "FILE", conflicts_with = "demo")]
    file: Option<PathBuf>,

    /// Run with a simulated studio
    #[arg(long)]
    demo: bool,

    /// Realtime database root
    #[arg(long, env = "ATELIER_DATABASE_URL", default_value = DEFAULT_DATABASE_URL, global = true)]
    database_url: String,

    /// Gallery JSON feed
    #[arg(long, env = "ATELIER_GALLERY_URL", default_value = DEFAULT_GALLERY_URL, global = true)]
    gallery_url: String,

    /// Orchestration service exposing wake/stop
    #[arg(long, env = "ATELIER_CONTROL_URL", default_value = DEFAULT_CONTROL_URL, global = true)]
    control_url: String,

    /// Seconds between chat feed releases
    #[arg(long, env = "ATELIER_DRIP_INTERVAL_SECS", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    drip_interval_secs: u64,

    /// Lines kept in the chat feed
    #[arg(long, env = "ATELIER_LOG_CAPACITY", default_value_t = 8, value_parser = clap::value_parser!(u64).range(1..))]
    log_capacity: u64,

    /// Directory for the log file written while the TUI runs
    #[arg(long, env = "ATELIER_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wake the studio up
    Wake,
    /// Stop every agent
    Stop,
    /// Print the gallery, newest first, as JSON
    Gallery,
    /// Queue a paid commission
    Commission {
        /// What the artwork should show
        #[arg(long)]
        prompt: String,
        /// Commission tier (budget or standard)
        #[arg(long, default_value = DEFAULT_TIER)]
        tier: String,
        /// Wallet address of the buyer
        #[arg(long)]
        buyer: String,
        /// Hash of the payment transaction sent to the treasury
        #[arg(long)]
        tx_hash: String,
    },
}

impl Cli {
    fn endpoints(&self) -> Endpoints {
        Endpoints {
            database_url: self.database_url.clone(),
            gallery_url: self.gallery_url.clone(),
            control_url: self.control_url.clone(),
        }
    }

    fn source(&self) -> Option<SourceKind> {
        if self.demo {
            Some(SourceKind::Demo)
        } else if let Some(path) = &self.file {
            Some(SourceKind::File(path.clone()))
        } else if self.stream {
            Some(SourceKind::Stream)
        } else {
            None
        }
    }
}

/// File logging for the TUI so the terminal stays clean
fn init_file_logging(log_dir: Option<PathBuf>) -> (PathBuf, WorkerGuard) {
    let log_dir = log_dir.unwrap_or_else(std::env::temp_dir);
    let file_appender = tracing_appender::rolling::never(&log_dir, "atelier.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    (log_dir.join("atelier.log"), guard)
}

/// Stderr logging for the one-shot subcommands
fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn env_filter() -> EnvFilter {
    // Default to info for the app, warn for dependencies
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "atelier=info,warn".into())
}

/// Tier label, price and perks as printed after a commission
fn describe_tier(tier: &Tier) -> String {
    let mut text = format!("{} for {} ETH\n", tier.label, tier.price);
    for perk in tier.perks {
        text.push_str(&format!("  - {}\n", perk));
    }
    text
}

async fn run_command(cli: &Cli, command: &Command) -> Result<()> {
    let client = http_client()?;
    let endpoints = cli.endpoints();

    match command {
        Command::Wake | Command::Stop => {
            let action = if matches!(command, Command::Wake) {
                ControlAction::Wake
            } else {
                ControlAction::Stop
            };
            let notice = ControlClient::new(client, endpoints.control_url).send(action).await;
            match notice.level {
                NoticeLevel::Info => println!("{}", notice.text),
                NoticeLevel::Error => return Err(AtelierError::Control(notice.text)),
            }
        }
        Command::Gallery => {
            let artworks = fetch_gallery(&client, &endpoints.gallery_url).await;
            println!("{}", serde_json::to_string_pretty(&artworks)?);
        }
        Command::Commission {
            prompt,
            tier,
            buyer,
            tx_hash,
        } => {
            let mut flow = CommissionFlow::new();
            flow.set_prompt(prompt.as_str());
            flow.select_tier(tier)?;

            let payment = PresignedPayment {
                tx_hash: tx_hash.clone(),
            };
            let store = FirebaseCommissionStore::new(client, &endpoints.database_url);
            flow.submit(buyer, &payment, &store).await;
            match flow.step() {
                CommissionStep::Success { tx_hash } => {
                    println!("Commission queued (tx {})", tx_hash);
                    print!("{}", describe_tier(flow.tier()));
                }
                _ => {
                    let reason = flow.error().unwrap_or("commission was not submitted").to_string();
                    return Err(AtelierError::InvalidInput(reason));
                }
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        init_stderr_logging();
        if let Err(e) = run_command(&cli, command).await {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Validate arguments
    let Some(source) = cli.source() else {
        eprintln!("Error: one of --stream, --file or --demo must be specified");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  atelier --stream             Follow the live studio");
        eprintln!("  atelier --file office.jsonl  Tail a snapshot file");
        eprintln!("  atelier --demo               Run with a simulated studio");
        eprintln!();
        eprintln!("Run 'atelier --help' for more options");
        std::process::exit(1);
    };

    let (log_path, _guard) = init_file_logging(cli.log_dir.clone());
    tracing::info!(path = %log_path.display(), "logging to file");

    let config = AppConfig {
        source,
        endpoints: cli.endpoints(),
        drip_interval: Duration::from_secs(cli.drip_interval_secs),
        log_capacity: cli.log_capacity as usize,
        ..AppConfig::default()
    };

    let result = match App::new(config) {
        Ok(mut app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "atelier exited with an error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
