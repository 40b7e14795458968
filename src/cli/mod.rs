//! Command-line interface.

mod ask;
mod check;
mod search;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use glossa::Config;

#[derive(Parser)]
#[command(name = "glossa")]
#[command(about = "Answer questions from a biodecoding glossary", long_about = None)]
pub(crate) struct Cli {
    /// Config file (default: ~/.glossa/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Glossary JSON file, overrides the configured path
    #[arg(long, global = true)]
    glossary: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub(crate) json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve glossary entries for a query
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Maximum entries to return
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Show which strategy matched each entry
        #[arg(long)]
        explain: bool,
        /// Print hits as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the context block the generator would receive
    Context {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Answer one question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Interactive question loop
    Console {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Validate the glossary and print index statistics
    Check,
    /// Show version information
    Version,
}

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("glossa {}", env!("CARGO_PKG_VERSION"));
            println!("Run 'glossa --help' for usage.");
            return Ok(());
        }
    };

    if let Commands::Version = command {
        println!("glossa {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = load_config(cli.config, cli.glossary)?;

    match command {
        Commands::Search {
            query,
            limit,
            explain,
            json,
        } => search::cmd_search(&config, &query.join(" "), limit, explain, json)?,
        Commands::Context { query, limit } => {
            search::cmd_context(&config, &query.join(" "), limit)?
        }
        Commands::Ask { question, limit } => {
            ask::cmd_ask(&config, &question.join(" "), limit).await?
        }
        Commands::Console { limit } => ask::cmd_console(&config, limit).await?,
        Commands::Check => check::cmd_check(&config)?,
        Commands::Version => {}
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>, glossary: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_with_env(&path, |key| std::env::var(key).ok())
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().with_context(|| "Failed to load configuration")?,
    };

    if let Some(glossary) = glossary {
        config.glossary.path = glossary;
    }

    Ok(config)
}

/// Entries per query: the explicit limit, else the configured maximum.
fn entry_cap(config: &Config, limit: Option<usize>) -> usize {
    limit.unwrap_or(config.glossary.max_entries).max(1)
}
