//! Procedure Assistant - voice dialogue controller for experiment procedures.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use procedure_assistant::config::{AssistantConfig, ConfigLoader};
use procedure_assistant::console;
use procedure_assistant::dialogue::IntentEvent;
use procedure_assistant::transport::IntentClient;

#[derive(Parser)]
#[command(
    name = "procedure-assistant",
    about = "Voice dialogue controller for experiment procedures",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (defaults to .procedure-assistant.toml, then the user config dir).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for intents and run the dialogue.
    Serve,
    /// Send one intent to a running assistant and print the reply.
    Send {
        /// Intent name, with or without namespace (e.g. `nextStep`).
        intent: String,
        /// Slot as name=value (e.g. --slot procedure=two).
        #[arg(short, long = "slot", value_parser = parse_slot)]
        slots: Vec<(String, String)>,
        /// Session id; a random one is used when omitted.
        #[arg(long)]
        session: Option<String>,
    },
}

fn parse_slot(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{s}'"))
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn load_config(path: Option<PathBuf>) -> AssistantConfig {
    let loader = path.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    loader.load_or_default()
}

async fn run_serve(config: &AssistantConfig) -> ExitCode {
    let handle = match procedure_assistant::assistant::serve(config) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start assistant");
            console::print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        socket = %handle.socket_path().display(),
        store = %config.store.base_url,
        display = config.display.enabled,
        "Procedure assistant ready"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
    tracing::info!("Shutting down");
    handle.shutdown();
    ExitCode::SUCCESS
}

async fn run_send(
    config: &AssistantConfig,
    intent: String,
    slots: Vec<(String, String)>,
    session: Option<String>,
) -> ExitCode {
    let intent_name = if intent.contains(':') {
        intent
    } else {
        format!("{}:{intent}", config.intents.namespace)
    };
    let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let event = slots
        .into_iter()
        .fold(IntentEvent::new(intent_name, session_id), |event, (name, value)| {
            event.with_slot(name, value)
        });
    console::print_intent(&event);

    let client = IntentClient::with_path(&config.transport.socket_path)
        .with_timeout(config.transport.timeout());
    match client.send(&event).await {
        Ok(response) => {
            console::print_response(&response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            console::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config);

    match cli.command {
        Commands::Serve => run_serve(&config).await,
        Commands::Send {
            intent,
            slots,
            session,
        } => run_send(&config, intent, slots, session).await,
    }
}
