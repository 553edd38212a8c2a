use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use tubestats::config::{init_logger, load_environment, ApiConfig};
use tubestats::services::{CsvEmitter, RecordEmitter, RecordSetBuilder, SystemClock, YouTubeClient};

/// Search YouTube for a term and write one CSV row per video with its video and channel statistics.
#[derive(Debug, Parser)]
#[command(name = "tubestats", version)]
struct Args {
    /// YouTube Data API key
    api_key: String,

    /// Keyword(s) to search for
    search_term: String,

    /// Write the CSV to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of search results to request (1-50)
    #[arg(long)]
    max_results: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_environment();
    init_logger();

    let args = Args::parse();

    let mut config = ApiConfig::from_env(args.api_key);
    if let Some(max_results) = args.max_results {
        config = config.with_max_results(max_results);
    }

    let client = YouTubeClient::new(config).context("Failed to create YouTube client")?;
    let clock = SystemClock;
    let builder = RecordSetBuilder::new(&client, &client, &clock);

    let records = match builder.search_and_build(&client, &args.search_term).await {
        Ok(records) => records,
        Err(e) => {
            eprintln!("{}", summary(&args.search_term, 0));
            return Err(anyhow::Error::new(e)
                .context(format!("Search for '{}' failed", args.search_term)));
        }
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            CsvEmitter::new(BufWriter::new(file)).emit(&records)?;
            info!("Wrote {} records to {}", records.len(), path.display());
        }
        None => CsvEmitter::new(io::stdout().lock()).emit(&records)?,
    }

    eprintln!("{}", summary(&args.search_term, records.len()));

    Ok(())
}

fn summary(search_term: &str, found: usize) -> String {
    if found == 0 {
        format!("No videos found that match {search_term}")
    } else {
        format!("Videos found: {found}")
    }
}
