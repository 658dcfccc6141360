//! chirpd binary entry point: read the environment, open the database,
//! serve until a shutdown signal lands.

use std::process;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chirpd::{AppState, Config, Error, Server, Store};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("fatal: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    info!(platform = %config.platform, "configuration loaded");

    let store = Store::open(&config.db_path)?;
    info!(db = %config.db_path.display(), "database ready");

    info!(root = %config.static_dir.display(), "serving static files under /app");
    let state = Arc::new(AppState::new(store, config.platform, config.static_dir));

    Server::bind(&config.bind_addr)
        .await?
        .serve(chirpd::routes(), state)
        .await
}
