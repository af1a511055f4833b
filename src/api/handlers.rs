use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
};
use log::info;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::Payload;
use crate::api::views::{ArticleEnvelope, ArticleView, HealthResponse};
use crate::controller::{ArticleController, PokemonController, TrainerController, UserController};
use crate::model::{
    ArticleFilter, ArticlePatch, Id, NewArticle, NewPokemon, NewTrainer, NewUser, Pokemon,
    PokemonFilter, Trainer, TrainerWithPokemon, User,
};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    pub title: Option<String>,
    pub author_id: Option<Id>,
    /// Comma separated list of relations to eager-load. Only `author` is known.
    pub include: Option<String>,
}

impl ArticleQuery {
    fn includes_author(&self) -> bool {
        self.include
            .as_deref()
            .is_some_and(|inc| inc.split(',').any(|rel| rel.trim() == "author"))
    }

    fn filter(&self) -> Option<ArticleFilter> {
        if self.title.is_none() && self.author_id.is_none() {
            return None;
        }
        Some(ArticleFilter {
            title: self.title.clone(),
            author_id: self.author_id,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    pub user_id: Option<Id>,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// One log line per request: `METHOD URI STATUS`
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    info!("{} {} {}", method, uri, response.status().as_u16());
    response
}

// Articles

pub async fn list_articles<S: Store>(
    State(store): State<AppState<S>>,
    Query(query): Query<ArticleQuery>,
) -> ApiResult<Json<Vec<ArticleView>>> {
    let controller = ArticleController::new(store);
    let views: Vec<ArticleView> = if query.includes_author() {
        controller
            .list_with_author(query.filter())
            .await?
            .into_iter()
            .map(ArticleView::from)
            .collect()
    } else {
        controller
            .list(query.filter())
            .await?
            .into_iter()
            .map(ArticleView::from)
            .collect()
    };
    Ok(Json(views))
}

pub async fn get_article<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    Query(query): Query<ArticleQuery>,
) -> ApiResult<Json<ArticleView>> {
    let controller = ArticleController::new(store);
    let view: ArticleView = if query.includes_author() {
        controller.get_with_author(id).await?.into()
    } else {
        controller.get(id).await?.into()
    };
    Ok(Json(view))
}

pub async fn create_article<S: Store>(
    State(store): State<AppState<S>>,
    Payload(payload): Payload<NewArticle>,
) -> ApiResult<Json<ArticleEnvelope>> {
    let created = ArticleController::new(store).create(payload).await?;
    Ok(Json(created.into()))
}

pub async fn update_article<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    Payload(payload): Payload<ArticlePatch>,
) -> ApiResult<Json<ArticleEnvelope>> {
    let updated = ArticleController::new(store).update(id, payload).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_article<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    ArticleController::new(store).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_article_author<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
    Payload(payload): Payload<AuthorRequest>,
) -> ApiResult<Json<ArticleView>> {
    let loaded = ArticleController::new(store)
        .set_author(id, payload.user_id)
        .await?;
    Ok(Json(loaded.into()))
}

// Users

pub async fn list_users<S: Store>(State(store): State<AppState<S>>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(UserController::new(store).list().await?))
}

pub async fn get_user<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<Json<User>> {
    Ok(Json(UserController::new(store).get(id).await?))
}

pub async fn create_user<S: Store>(
    State(store): State<AppState<S>>,
    Payload(payload): Payload<NewUser>,
) -> ApiResult<Json<User>> {
    let created = UserController::new(store).create(payload).await?;
    Ok(Json(created.entity))
}

pub async fn delete_user<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    UserController::new(store).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Pokemon

pub async fn list_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Query(filter): Query<PokemonFilter>,
) -> ApiResult<Json<Vec<Pokemon>>> {
    Ok(Json(PokemonController::new(store).list(filter).await?))
}

pub async fn get_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Pokemon>> {
    Ok(Json(PokemonController::new(store).get(id).await?))
}

pub async fn create_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Payload(payload): Payload<NewPokemon>,
) -> ApiResult<Json<Pokemon>> {
    let created = PokemonController::new(store).create(payload).await?;
    Ok(Json(created.entity))
}

pub async fn delete_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    PokemonController::new(store).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Trainers

pub async fn list_trainers<S: Store>(
    State(store): State<AppState<S>>,
) -> ApiResult<Json<Vec<TrainerWithPokemon>>> {
    Ok(Json(TrainerController::new(store).list().await?))
}

pub async fn get_trainer<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<Json<TrainerWithPokemon>> {
    Ok(Json(TrainerController::new(store).get(id).await?))
}

pub async fn create_trainer<S: Store>(
    State(store): State<AppState<S>>,
    Payload(payload): Payload<NewTrainer>,
) -> ApiResult<Json<Trainer>> {
    let created = TrainerController::new(store).create(payload).await?;
    Ok(Json(created.entity))
}

pub async fn delete_trainer<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    TrainerController::new(store).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn gain_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Path((trainer_id, pokemon_id)): Path<(Id, Id)>,
) -> ApiResult<Json<TrainerWithPokemon>> {
    let updated = TrainerController::new(store)
        .gain_pokemon(trainer_id, pokemon_id)
        .await?;
    Ok(Json(updated.entity))
}

pub async fn lose_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Path((trainer_id, pokemon_id)): Path<(Id, Id)>,
) -> ApiResult<Json<TrainerWithPokemon>> {
    let updated = TrainerController::new(store)
        .lose_pokemon(trainer_id, pokemon_id)
        .await?;
    Ok(Json(updated.entity))
}
