use log::info;
use menagerie::config::{AppConfig, StoreBackend};
use menagerie::seed;
use menagerie::store::traits::Store;
use menagerie::store::{MemoryStore, PostgresStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = AppConfig::load()?;
    info!(
        "Configuration loaded: server={}:{} backend={:?}",
        config.server.host, config.server.port, config.database.backend
    );

    match config.database.backend {
        StoreBackend::Postgres => {
            let database_url = config.database_url()?;
            info!("Connecting to PostgreSQL...");
            let store = PostgresStore::new(&database_url, config.max_connections()).await?;
            start(store, &config).await
        }
        StoreBackend::Memory => {
            info!("Using in-memory store, data is lost on shutdown");
            start(MemoryStore::new(), &config).await
        }
    }
}

async fn start<S: Store + 'static>(store: S, config: &AppConfig) -> anyhow::Result<()> {
    store.migrate().await?;
    let store = Arc::new(store);

    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        info!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
    }

    let listener = TcpListener::bind(config.server_address()).await?;
    menagerie::run_server(store, listener, config).await
}
