//! socratic — tutoring feedback relay service.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

const DEFAULT_LOG_FILTER: &str =
    "socratic=info,socratic_server=info,socratic_core=info,socratic_providers=info,tower_http=info";

#[derive(Parser)]
#[command(name = "socratic", version, about = "LLM feedback relay for student transcripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        bind: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List languages parent guidance can be translated into
    Languages,

    /// Load and validate the configuration
    CheckConfig {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter socratic.toml
    Init,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { bind, config } => commands::serve::execute(bind, config).await,
        Commands::Languages => commands::languages::execute(),
        Commands::CheckConfig { config } => commands::check_config::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
