use anirec::algorithms::SimilarityMatrix;
use anirec::services::dataset::AnimeCatalog;
use anirec::{init_tracing, Config};
use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Precompute the title similarity matrix", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Overrides `dataset.path` from the config.
    #[arg(short, long)]
    dataset: Option<String>,

    /// Overrides `dataset.similarity_path` from the config.
    #[arg(short, long)]
    output: Option<String>,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = Config::load(&args.config)?;
    let dataset = args.dataset.unwrap_or(config.dataset.path);
    let output = args.output.unwrap_or(config.dataset.similarity_path);

    let catalog = AnimeCatalog::load(&dataset)?;
    let started = Instant::now();
    let matrix = SimilarityMatrix::build(catalog.records());
    info!("Built {}x{} similarity matrix in {:?}", matrix.len(), matrix.len(), started.elapsed());

    matrix.save(&output)?;
    info!("Wrote similarity matrix to {}", output);

    Ok(())
}
