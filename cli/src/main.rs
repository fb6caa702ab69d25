use anyhow::Result;
use clap::{Parser, Subcommand};
use seriesrec_core::persist::IndexPaths;
use seriesrec_core::store::SledStore;
use seriesrec_core::{Engine, SearchConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "seriesrec", about = "Search and recommend TV series", long_about = None)]
struct Args {
    /// Model directory written by the indexer
    #[arg(long, env = "SERIESREC_INDEX", default_value = "./index")]
    index: PathBuf,
    /// Catalog and likes store directory
    #[arg(long, env = "SERIESREC_STORE", default_value = "./store")]
    store: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank series for a free-text query
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(short = 'k', long, default_value_t = 5)]
        limit: usize,
    },
    /// Recommend series from the liked set
    Recommend {
        #[arg(short = 'k', long, default_value_t = 5)]
        limit: usize,
    },
    /// Add a series to the liked set
    Like { title: String },
    /// Remove a series from the liked set
    Unlike { title: String },
    /// List liked series
    Likes,
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let store = SledStore::open(&args.store)?;

    match args.command {
        Command::Search { query, limit } => {
            let engine = Engine::load(&IndexPaths::new(&args.index), SearchConfig::default())?;
            print(&seriesrec_cli::search(&engine, &store, &query.join(" "), limit)?)
        }
        Command::Recommend { limit } => {
            let engine = Engine::load(&IndexPaths::new(&args.index), SearchConfig::default())?;
            print(&seriesrec_cli::recommend(&engine, &store, &store, limit)?)
        }
        Command::Like { title } => print(&seriesrec_cli::like(&store, &title)?),
        Command::Unlike { title } => print(&seriesrec_cli::unlike(&store, &title)?),
        Command::Likes => print(&seriesrec_cli::list_likes(&store)?),
    }
}
