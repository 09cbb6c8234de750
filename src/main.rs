//! # Cinematch CLI (`cine`)
//!
//! The `cine` binary builds the recommendation index from the configured
//! CSV tables and answers "movies similar to X" queries, either once from
//! the command line or over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! cine --config ./config/cine.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cine recommend "<title>"` | Print the most similar titles |
//! | `cine terms "<title>"` | Print an item's highest-weighted terms |
//! | `cine stats` | Summarize the built index |
//! | `cine serve` | Start the HTTP server |
//! | `cine completions <shell>` | Print shell completions |
//!
//! ## Examples
//!
//! ```bash
//! cine recommend "The Dark Knight" --limit 10 --scores
//! cine recommend avatar --json
//! RUST_LOG=debug cine stats
//! ```

mod config;
mod engine;
mod loader;
mod recommend;
mod server;
mod stats;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Cinematch CLI — content-based movie recommendations.
///
/// All commands except `completions` read a TOML configuration file
/// given by `--config`.
#[derive(Parser)]
#[command(
    name = "cine",
    about = "Cinematch — content-based movie recommendations",
    version,
    long_about = "Cinematch flattens each movie's overview, genres, keywords, top cast, and \
    directors into one bag of words, weights terms with TF-IDF, and ranks other movies by \
    cosine similarity."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/cine.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title.
    ///
    /// Title lookup is case-insensitive. An unknown title prints a notice
    /// and exits successfully.
    Recommend {
        /// Title to find neighbours for.
        title: String,

        /// Number of recommendations (defaults to `[recommend].default_limit`).
        #[arg(long)]
        limit: Option<usize>,

        /// Print similarity scores next to titles.
        #[arg(long)]
        scores: bool,

        /// Print JSON instead of a numbered list.
        #[arg(long)]
        json: bool,
    },

    /// Show the highest-weighted vocabulary terms of a title.
    Terms {
        title: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Build the index and print a summary.
    Stats,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Generate shell completions.
    Completions {
        shell: Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "cine", &mut std::io::stdout());
        return Ok(());
    }

    init_logging();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Recommend {
            title,
            limit,
            scores,
            json,
        } => {
            recommend::run_recommend(&cfg, &title, limit, scores, json)?;
        }
        Commands::Terms { title, limit } => {
            recommend::run_terms(&cfg, &title, limit)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
