mod render;
mod repl;

use std::path::PathBuf;

use anyhow::Context;
use cardbound_engine::presentation::card_line;
use cardbound_engine::{ClientConfig, Game, HttpAuthority};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::render::Terminal;

#[derive(Subcommand)]
enum Cmd {
    /// Interactive session against the game server
    Play,
    /// Print the card catalog
    Catalog {
        /// Emit the catalog as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Parser)]
#[command(name = "cardbound")]
#[command(about = "Card-driven combat client")]
struct Cli {
    /// Config file (.json, .yaml or .yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Game server base URL
    #[arg(long, global = true)]
    server: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Card catalog JSON file (defaults to the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

impl Cli {
    /// Defaults, then config file, then environment, then flags.
    fn resolve_config(&self) -> anyhow::Result<ClientConfig> {
        let mut cfg = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        }
        .with_env()?;
        if let Some(url) = &self.server {
            cfg.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            cfg.timeout_secs = secs;
        }
        if let Some(path) = &self.catalog {
            cfg.catalog_path = Some(path.clone());
        }
        Ok(cfg)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;
    let catalog = cfg.catalog()?;

    match cli.cmd {
        Cmd::Catalog { json } => {
            if json {
                let cards: Vec<_> = catalog.iter().collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&cards).context("failed to encode catalog")?
                );
            } else {
                for card in catalog.iter() {
                    println!("{}", card_line(card));
                }
            }
        }
        Cmd::Play => {
            info!(server = %cfg.base_url, timeout = cfg.timeout_secs, cards = catalog.len(), "starting session");
            let authority = HttpAuthority::from_config(&cfg)
                .with_context(|| format!("failed to build HTTP client for {}", cfg.base_url))?;
            let mut game = Game::with_catalog(authority, Terminal, catalog);
            repl::run(&mut game).await?;
        }
    }
    Ok(())
}
