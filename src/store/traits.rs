use crate::model::{
    Article, ArticleFilter, ArticleRecord, ArticleWithAuthor, Id, Pokemon, PokemonFilter, Trainer,
    User,
};
use crate::store::StoreResult;

/// Schema management and the open/close lifecycle of a store handle.
/// Opening is the constructor of each implementation.
#[async_trait::async_trait]
pub trait StoreLifecycle: Send + Sync {
    /// Create the tables if they are missing
    async fn migrate(&self) -> StoreResult<()>;
    /// Drop every row and recreate the tables
    async fn reset(&self) -> StoreResult<()>;
    /// Empty the pokemon, trainer and junction tables and restart their ids.
    /// Articles and users are left alone.
    async fn reset_roster(&self) -> StoreResult<()>;
    /// Release connections. The handle must not be used afterwards.
    async fn close(&self);
}

#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    async fn insert_article(&self, record: ArticleRecord) -> StoreResult<Article>;
    async fn get_article(&self, id: Id) -> StoreResult<Option<Article>>;
    /// Ordered by id. `None` returns every row.
    async fn list_articles(&self, filter: Option<&ArticleFilter>) -> StoreResult<Vec<Article>>;
    /// Overwrites every column except the id, but only while the stored row
    /// is still at `expected_version`. Returns false when the row is gone or
    /// has moved on.
    async fn update_article(&self, article: &Article, expected_version: i32) -> StoreResult<bool>;
    /// Writes only the author foreign key
    async fn set_article_author(&self, id: Id, author_id: Option<Id>) -> StoreResult<bool>;
    async fn delete_article(&self, id: Id) -> StoreResult<bool>;

    /// Articles joined with their author in a single read
    async fn list_articles_with_author(
        &self,
        filter: Option<&ArticleFilter>,
    ) -> StoreResult<Vec<ArticleWithAuthor>>;
    async fn get_article_with_author(&self, id: Id) -> StoreResult<Option<ArticleWithAuthor>>;
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, name: Option<String>) -> StoreResult<User>;
    async fn get_user(&self, id: Id) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    /// Articles written by the user keep existing with no author
    async fn delete_user(&self, id: Id) -> StoreResult<bool>;
}

#[async_trait::async_trait]
pub trait PokemonStore: Send + Sync {
    async fn insert_pokemon(&self, name: &str, kind: &str) -> StoreResult<Pokemon>;
    async fn get_pokemon(&self, id: Id) -> StoreResult<Option<Pokemon>>;
    async fn list_pokemon(&self, filter: Option<&PokemonFilter>) -> StoreResult<Vec<Pokemon>>;
    /// Also removes the pokemon from every trainer
    async fn delete_pokemon(&self, id: Id) -> StoreResult<bool>;
}

#[async_trait::async_trait]
pub trait TrainerStore: Send + Sync {
    /// Fails with `StoreError::UniqueViolation` when the name is taken
    async fn insert_trainer(&self, name: &str) -> StoreResult<Trainer>;
    async fn get_trainer(&self, id: Id) -> StoreResult<Option<Trainer>>;
    async fn list_trainers(&self) -> StoreResult<Vec<Trainer>>;
    /// Releases the trainer's pokemon without deleting them
    async fn delete_trainer(&self, id: Id) -> StoreResult<bool>;

    /// Junction rows. Both return whether a row was actually added or removed.
    async fn link_pokemon(&self, trainer_id: Id, pokemon_id: Id) -> StoreResult<bool>;
    async fn unlink_pokemon(&self, trainer_id: Id, pokemon_id: Id) -> StoreResult<bool>;
    async fn list_trainer_pokemon(&self, trainer_id: Id) -> StoreResult<Vec<Pokemon>>;
}

pub trait Store:
    StoreLifecycle + ArticleStore + UserStore + PokemonStore + TrainerStore + Send + Sync
{
}

impl<T> Store for T where
    T: StoreLifecycle + ArticleStore + UserStore + PokemonStore + TrainerStore + Send + Sync
{
}
