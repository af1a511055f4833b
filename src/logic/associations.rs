//! Article belongs-to User (as `author`) and Trainer has-many Pokemon
//! through the `trainer_pokemon` junction.

use log::{debug, info};

use crate::error::{ModelError, ModelResult};
use crate::model::{
    Article, ArticleFilter, ArticleWithAuthor, EntityKind, Id, Pokemon, Trainer,
    TrainerWithPokemon, User,
};
use crate::store::traits::{ArticleStore, TrainerStore};

pub struct Associations;

impl Associations {
    /// Point the article at `user`, replacing any previous author.
    /// `None` clears the link. Only the foreign key is written, so the
    /// article version is left alone.
    pub async fn set_author<S: ArticleStore>(
        store: &S,
        article: &mut Article,
        user: Option<&User>,
    ) -> ModelResult<()> {
        let author_id = user.map(|u| u.id);
        if !store.set_article_author(article.id, author_id).await? {
            return Err(ModelError::not_found(EntityKind::Article, article.id));
        }
        article.author_id = author_id;
        info!("Article {} author set to {:?}", article.id, author_id);
        Ok(())
    }

    /// Article with its author resolved in the same read
    pub async fn find_article_with_author<S: ArticleStore>(
        store: &S,
        id: Id,
    ) -> ModelResult<ArticleWithAuthor> {
        store
            .get_article_with_author(id)
            .await?
            .ok_or_else(|| ModelError::not_found(EntityKind::Article, id))
    }

    pub async fn find_articles_with_author<S: ArticleStore>(
        store: &S,
        filter: Option<&ArticleFilter>,
    ) -> ModelResult<Vec<ArticleWithAuthor>> {
        Ok(store.list_articles_with_author(filter).await?)
    }

    /// First article matching the filter, author included
    pub async fn find_one_with_author<S: ArticleStore>(
        store: &S,
        filter: &ArticleFilter,
    ) -> ModelResult<ArticleWithAuthor> {
        store
            .list_articles_with_author(Some(filter))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ModelError::not_found(
                    EntityKind::Article,
                    serde_json::to_string(filter).unwrap_or_default(),
                )
            })
    }

    pub async fn pokemon_of<S: TrainerStore>(
        store: &S,
        trainer: &Trainer,
    ) -> ModelResult<TrainerWithPokemon> {
        let pokemon = store.list_trainer_pokemon(trainer.id).await?;
        Ok(TrainerWithPokemon {
            trainer: trainer.clone(),
            pokemon,
        })
    }

    /// Adding a pokemon the trainer already holds is a no-op
    pub async fn add_pokemon<S: TrainerStore>(
        store: &S,
        trainer: &Trainer,
        pokemon: &Pokemon,
    ) -> ModelResult<TrainerWithPokemon> {
        if store.link_pokemon(trainer.id, pokemon.id).await? {
            info!("Trainer {} gained pokemon {}", trainer.id, pokemon.id);
        } else {
            debug!("Trainer {} already holds pokemon {}", trainer.id, pokemon.id);
        }
        Self::pokemon_of(store, trainer).await
    }

    /// Removing a pokemon the trainer does not hold is a no-op
    pub async fn remove_pokemon<S: TrainerStore>(
        store: &S,
        trainer: &Trainer,
        pokemon: &Pokemon,
    ) -> ModelResult<TrainerWithPokemon> {
        if store.unlink_pokemon(trainer.id, pokemon.id).await? {
            info!("Trainer {} lost pokemon {}", trainer.id, pokemon.id);
        } else {
            debug!("Trainer {} does not hold pokemon {}", trainer.id, pokemon.id);
        }
        Self::pokemon_of(store, trainer).await
    }
}
