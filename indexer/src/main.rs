use anyhow::Result;
use clap::{Parser, Subcommand};
use seriesrec_core::tokenizer::TokenizerConfig;
use seriesrec_core::FitOptions;
use seriesrec_indexer::build_index;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the series vector space model and catalog store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the model from catalog JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output model directory
        #[arg(long, env = "SERIESREC_INDEX", default_value = "./index")]
        output: PathBuf,
        /// Catalog store directory to (re)populate
        #[arg(long, env = "SERIESREC_STORE")]
        store: Option<PathBuf>,
        /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
        #[arg(long, default_value_t = false)]
        smoothed_idf: bool,
        /// Stem terms (English) before weighting
        #[arg(long, default_value_t = false)]
        stem: bool,
        /// Drop English stopwords before weighting
        #[arg(long, default_value_t = false)]
        stopwords: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, store, smoothed_idf, stem, stopwords } => {
            let options = FitOptions { smoothed_idf, tokenizer: TokenizerConfig { stem, stopwords } };
            build_index(&input, &output, store.as_deref(), options)?;
            Ok(())
        }
    }
}
