use anirec::config::ModelKind;
use anirec::services::dataset::AnimeCatalog;
use anirec::services::training::TrainingService;
use anirec::{init_tracing, Config};
use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train both classifiers and report holdout metrics", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Overrides `dataset.path` from the config.
    #[arg(short, long)]
    dataset: Option<String>,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut config = Config::load(&args.config)?;
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }
    info!("Training configuration: {:?}", config.model);

    let catalog = AnimeCatalog::load(&config.dataset.path)?;
    let trained = TrainingService::new(config.model.clone()).train(&catalog)?;

    println!(
        "{} titles, {} train / {} test rows, {} feature columns",
        catalog.len(),
        trained.train_rows(),
        trained.test_rows(),
        trained.schema().width()
    );
    println!("{:<15} {:>9} {:>10} {:>8} {:>8}", "model", "accuracy", "precision", "recall", "f1");
    for kind in ModelKind::ALL {
        if let Some(metrics) = trained.evaluation(kind) {
            let marker = if kind == config.model.active { "*" } else { "" };
            println!(
                "{:<15} {:>9.3} {:>10.3} {:>8.3} {:>8.3} {}",
                kind.display_name(),
                metrics.accuracy,
                metrics.precision,
                metrics.recall,
                metrics.f1_score,
                marker
            );
        }
    }

    Ok(())
}
