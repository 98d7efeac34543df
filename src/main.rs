use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod controllers;
mod error;
mod models;
mod storage;
mod types;

use config::Config;
pub(crate) use error::{AppError, AppResult};
use models::Language;
use storage::AnyStorage;

/// Everything a request needs. Cheap to clone.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub storage: AnyStorage,
}

#[derive(Parser)]
#[command(version, about = "Share short-lived code snippets")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, env = "SNIPBIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Create a paste from a file or stdin and print its link
    Put {
        /// Language label
        #[arg(short, long, default_value = Language::DEFAULT_LABEL)]
        lang: String,
        /// File to upload; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Print a paste
    Get {
        id: String,
        /// Print only the snippet
        #[arg(long)]
        raw: bool,
    },
    /// List known language labels
    Languages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Serve => commands::serve::run(load_app(config_path).await?).await,
        Command::Put { lang, file } => {
            commands::put::run(load_app(config_path).await?, &lang, file.as_deref()).await
        }
        Command::Get { id, raw } => {
            commands::get::run(load_app(config_path).await?, &id, raw).await
        }
        Command::Languages => {
            for lang in Language::ALL {
                println!("{:<12}{}", lang.label(), lang.display_name());
            }
            Ok(())
        }
    }
}

async fn load_app(config_path: Option<&Path>) -> anyhow::Result<App> {
    let config = Config::load(config_path)?;
    let storage = AnyStorage::from_config(&config.storage).await?;
    Ok(App { config, storage })
}
