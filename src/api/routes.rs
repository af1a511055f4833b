use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::store::traits::Store;

/// Full router. Paths not matched by the API are served from `static_dir`.
pub fn create_router<S: Store + 'static>(static_dir: &str) -> Router<Arc<S>> {
    api_routes::<S>()
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(handlers::log_requests))
}

pub fn api_routes<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Articles
        .route(
            "/articles",
            get(handlers::list_articles::<S>).post(handlers::create_article::<S>),
        )
        .route(
            "/articles/:id",
            get(handlers::get_article::<S>)
                .put(handlers::update_article::<S>)
                .delete(handlers::delete_article::<S>),
        )
        .route("/articles/:id/author", put(handlers::set_article_author::<S>))
        // Users
        .route(
            "/users",
            get(handlers::list_users::<S>).post(handlers::create_user::<S>),
        )
        .route(
            "/users/:id",
            get(handlers::get_user::<S>).delete(handlers::delete_user::<S>),
        )
        // Pokemon
        .route(
            "/pokemon",
            get(handlers::list_pokemon::<S>).post(handlers::create_pokemon::<S>),
        )
        .route(
            "/pokemon/:id",
            get(handlers::get_pokemon::<S>).delete(handlers::delete_pokemon::<S>),
        )
        // Trainers
        .route(
            "/trainers",
            get(handlers::list_trainers::<S>).post(handlers::create_trainer::<S>),
        )
        .route(
            "/trainers/:id",
            get(handlers::get_trainer::<S>).delete(handlers::delete_trainer::<S>),
        )
        .route(
            "/trainer/:trainer_id/pokemon/:pokemon_id",
            put(handlers::gain_pokemon::<S>),
        )
        .route(
            "/trainer/:trainer_id/pokemon/:pokemon_id/lose",
            put(handlers::lose_pokemon::<S>),
        )
}
