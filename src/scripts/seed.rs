use anyhow::{Context, Result};
use menagerie::config::AppConfig;
use menagerie::seed::{load_seed_data, POKEMON_COUNT, TRAINER_COUNT};
use menagerie::store::traits::StoreLifecycle;
use menagerie::store::PostgresStore;

/// Drops and recreates every table, then inserts random pokemon and trainers.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;
    let database_url = config.database_url()?;
    let store = PostgresStore::new(&database_url, config.max_connections())
        .await
        .context("Failed to connect to database")?;

    println!("Connected to database. Seeding...");
    load_seed_data(&store).await?;
    println!(
        "Seeded {} pokemon and {} trainers",
        POKEMON_COUNT, TRAINER_COUNT
    );

    store.close().await;
    Ok(())
}
