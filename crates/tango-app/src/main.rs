use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tango_core::respond;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;


use self::controller::AppController;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "tango", version, about = "Generate themed Japanese vocabulary lists")]
struct Cli {
    /// JSON config or profile file; the environment is used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one list and print the response
    Generate { theme: String },
    /// Answer one request per stdin line until EOF or Ctrl+C
    Serve,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    };

    // A pending stdin read sits on a blocking thread and never returns on its own
    runtime.shutdown_timeout(Duration::from_millis(100));
    code
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = profile::load_config(cli.config.as_deref())?;
    tracing::info!("Completion settings: {:?}", config.completion);

    let state = Arc::new(AppState::new(config));

    match cli.command {
        Command::Generate { theme } => {
            let response = respond(state.service.generate(&theme).await);
            println!("{}", serde_json::to_string_pretty(&response)?);

            if response.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Serve => {
            if atty::is(atty::Stream::Stdin) {
                eprintln!("Enter one theme (or JSON request body) per line, Ctrl+D to finish");
            }

            // Shutdown future (Ctrl+C)
            let shutdown = async {
                if let Err(e) = signal::ctrl_c().await {
                    tracing::error!("failed to listen for ctrl+c: {e}");
                    std::future::pending::<()>().await;
                }
            };

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            AppController::new(state)
                .run(stdin, tokio::io::stdout(), shutdown)
                .await?;

            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr; stdout carries responses only
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
