use anirec::{init_tracing, web, AppState, Config};
use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Anime recommendation web server", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)?;
    init_tracing(&config.server.log_level);

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers.max(1))
        .enable_all()
        .build()?
        .block_on(serve(config))
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting anime recommender with config: {:?}", config.server);

    let addr = config.server.socket_addr()?;
    let state = AppState::new(config).await?;
    let app = web::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
