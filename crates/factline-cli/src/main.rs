//! `factline` -- runs one stage of the fake-news pipeline.
//!
//! Provides the following subcommands:
//!
//! - `factline gateway` -- Public entry point (`POST /analisar`).
//! - `factline classifier` -- Classifier stage (`POST /classify`).
//! - `factline summarizer` -- Summarizer stage (`POST /summarize`).
//! - `factline config show` -- Print the resolved configuration.

use clap::{Parser, Subcommand};

use factline_services::Stage;

mod commands;

/// factline pipeline stages.
#[derive(Parser)]
#[command(name = "factline", about = "Fake-news classification pipeline", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start the public Gateway stage.
    Gateway(commands::serve::StageArgs),

    /// Start the Classifier stage.
    Classifier(commands::serve::StageArgs),

    /// Start the Summarizer stage.
    Summarizer(commands::serve::StageArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `factline config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Print the full resolved configuration as JSON.
    Show {
        /// Config file path (overrides `FACTLINE_CONFIG`).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Commands::Gateway(args) => commands::serve::run(Stage::Gateway, args).await?,
        Commands::Classifier(args) => commands::serve::run(Stage::Classifier, args).await?,
        Commands::Summarizer(args) => commands::serve::run(Stage::Summarizer, args).await?,
        Commands::Config { action } => match action {
            ConfigCmd::Show { config } => {
                let cfg = commands::load_config(config.as_deref()).await?;
                commands::config_cmd::config_show(&cfg)?;
            }
        },
    }

    Ok(())
}
