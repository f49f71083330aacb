use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use pairline::RoomKey;
use pairline::server::{ServerConfig, serve};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pairline")]
#[command(about = "Signaling broker pairing two WebRTC peers per room")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling server
    Serve {
        /// TOML file read before `PAIRLINE_*` environment variables
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        bind: Option<String>,

        #[arg(long)]
        fallback_name: Option<String>,

        /// Single origin allowed by CORS; `*` allows any
        #[arg(long)]
        allowed_origin: Option<String>,
    },
    /// Print a fresh room key
    RoomKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Serve {
            config,
            bind,
            fallback_name,
            allowed_origin,
        } => {
            let mut config = ServerConfig::load(config.as_deref())
                .context("Failed to load configuration")?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(name) = fallback_name {
                config.fallback_display_name = name;
            }
            if let Some(origin) = allowed_origin {
                config.allowed_origin = Some(origin);
            }
            let config = config.normalize();

            init_tracing(&config.log_filter);
            println!(
                "{} {}",
                "📡 Starting pairline on".green().bold(),
                config.bind_addr.cyan()
            );
            serve(config).await?;
            println!("{}", "👋 Server stopped".green());
        }
        Commands::RoomKey => {
            println!("{}", RoomKey::generate());
        }
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
