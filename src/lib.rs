pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{ModelError, ModelResult};
pub use model::*;
pub use store::{MemoryStore, PostgresStore, Store};

use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppConfig;

/// Serve the API on an already bound listener until ctrl-c, then close the store.
pub async fn run_server<S: Store + 'static>(
    store: Arc<S>,
    listener: TcpListener,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let app = routes::create_router::<S>(&config.server.static_dir).with_state(store.clone());

    info!("Menagerie server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing store");
    store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
