use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    Article, ArticleFilter, ArticleRecord, ArticleWithAuthor, EntityKind, Id, Pokemon,
    PokemonFilter, Trainer, User,
};
use crate::store::traits::{ArticleStore, PokemonStore, StoreLifecycle, TrainerStore, UserStore};
use crate::store::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    articles: BTreeMap<Id, Article>,
    users: BTreeMap<Id, User>,
    pokemon: BTreeMap<Id, Pokemon>,
    trainers: BTreeMap<Id, Trainer>,
    /// (trainer_id, pokemon_id)
    trainer_pokemon: BTreeSet<(Id, Id)>,
    next_id: Sequences,
}

/// Per-table counters, mimicking `BIGSERIAL` columns
#[derive(Debug, Default)]
struct Sequences {
    articles: Id,
    users: Id,
    pokemon: Id,
    trainers: Id,
}

fn advance(counter: &mut Id) -> Id {
    *counter += 1;
    *counter
}

impl Tables {
    fn with_author(&self, article: &Article) -> ArticleWithAuthor {
        ArticleWithAuthor {
            article: article.clone(),
            author: article
                .author_id
                .and_then(|id| self.users.get(&id))
                .cloned(),
        }
    }
}

/// Process-local store. Every table lives behind one lock so each call
/// observes a consistent snapshot, the same way a single SQL statement would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StoreLifecycle for MemoryStore {
    async fn migrate(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn reset(&self) -> StoreResult<()> {
        *self.tables.write() = Tables::default();
        Ok(())
    }

    async fn reset_roster(&self) -> StoreResult<()> {
        let mut tables = self.tables.write();
        tables.trainer_pokemon.clear();
        tables.trainers.clear();
        tables.pokemon.clear();
        tables.next_id.trainers = 0;
        tables.next_id.pokemon = 0;
        Ok(())
    }

    async fn close(&self) {}
}

#[async_trait::async_trait]
impl ArticleStore for MemoryStore {
    async fn insert_article(&self, record: ArticleRecord) -> StoreResult<Article> {
        let mut tables = self.tables.write();
        let id = advance(&mut tables.next_id.articles);
        let article = record.into_article(id);
        tables.articles.insert(id, article.clone());
        Ok(article)
    }

    async fn get_article(&self, id: Id) -> StoreResult<Option<Article>> {
        Ok(self.tables.read().articles.get(&id).cloned())
    }

    async fn list_articles(&self, filter: Option<&ArticleFilter>) -> StoreResult<Vec<Article>> {
        let tables = self.tables.read();
        Ok(tables
            .articles
            .values()
            .filter(|a| filter.map_or(true, |f| f.matches(a)))
            .cloned()
            .collect())
    }

    async fn update_article(&self, article: &Article, expected_version: i32) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        match tables.articles.get_mut(&article.id) {
            Some(stored) if stored.version == expected_version => {
                *stored = article.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_article_author(&self, id: Id, author_id: Option<Id>) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        match tables.articles.get_mut(&id) {
            Some(stored) => {
                stored.author_id = author_id;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_article(&self, id: Id) -> StoreResult<bool> {
        Ok(self.tables.write().articles.remove(&id).is_some())
    }

    async fn list_articles_with_author(
        &self,
        filter: Option<&ArticleFilter>,
    ) -> StoreResult<Vec<ArticleWithAuthor>> {
        let tables = self.tables.read();
        Ok(tables
            .articles
            .values()
            .filter(|a| filter.map_or(true, |f| f.matches(a)))
            .map(|a| tables.with_author(a))
            .collect())
    }

    async fn get_article_with_author(&self, id: Id) -> StoreResult<Option<ArticleWithAuthor>> {
        let tables = self.tables.read();
        Ok(tables.articles.get(&id).map(|a| tables.with_author(a)))
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, name: Option<String>) -> StoreResult<User> {
        let mut tables = self.tables.write();
        let id = advance(&mut tables.next_id.users);
        let user = User { id, name };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Id) -> StoreResult<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().users.values().cloned().collect())
    }

    async fn delete_user(&self, id: Id) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let removed = tables.users.remove(&id).is_some();
        if removed {
            for article in tables.articles.values_mut() {
                if article.author_id == Some(id) {
                    article.author_id = None;
                }
            }
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl PokemonStore for MemoryStore {
    async fn insert_pokemon(&self, name: &str, kind: &str) -> StoreResult<Pokemon> {
        let mut tables = self.tables.write();
        let id = advance(&mut tables.next_id.pokemon);
        let pokemon = Pokemon {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
        };
        tables.pokemon.insert(id, pokemon.clone());
        Ok(pokemon)
    }

    async fn get_pokemon(&self, id: Id) -> StoreResult<Option<Pokemon>> {
        Ok(self.tables.read().pokemon.get(&id).cloned())
    }

    async fn list_pokemon(&self, filter: Option<&PokemonFilter>) -> StoreResult<Vec<Pokemon>> {
        let tables = self.tables.read();
        Ok(tables
            .pokemon
            .values()
            .filter(|p| filter.map_or(true, |f| f.matches(p)))
            .cloned()
            .collect())
    }

    async fn delete_pokemon(&self, id: Id) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let removed = tables.pokemon.remove(&id).is_some();
        if removed {
            tables.trainer_pokemon.retain(|(_, pokemon_id)| *pokemon_id != id);
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl TrainerStore for MemoryStore {
    async fn insert_trainer(&self, name: &str) -> StoreResult<Trainer> {
        let mut tables = self.tables.write();
        if tables.trainers.values().any(|t| t.name == name) {
            return Err(StoreError::UniqueViolation {
                entity: EntityKind::Trainer,
                field: "name",
            });
        }
        let id = advance(&mut tables.next_id.trainers);
        let trainer = Trainer {
            id,
            name: name.to_string(),
        };
        tables.trainers.insert(id, trainer.clone());
        Ok(trainer)
    }

    async fn get_trainer(&self, id: Id) -> StoreResult<Option<Trainer>> {
        Ok(self.tables.read().trainers.get(&id).cloned())
    }

    async fn list_trainers(&self) -> StoreResult<Vec<Trainer>> {
        Ok(self.tables.read().trainers.values().cloned().collect())
    }

    async fn delete_trainer(&self, id: Id) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let removed = tables.trainers.remove(&id).is_some();
        if removed {
            tables.trainer_pokemon.retain(|(trainer_id, _)| *trainer_id != id);
        }
        Ok(removed)
    }

    async fn link_pokemon(&self, trainer_id: Id, pokemon_id: Id) -> StoreResult<bool> {
        Ok(self.tables.write().trainer_pokemon.insert((trainer_id, pokemon_id)))
    }

    async fn unlink_pokemon(&self, trainer_id: Id, pokemon_id: Id) -> StoreResult<bool> {
        Ok(self.tables.write().trainer_pokemon.remove(&(trainer_id, pokemon_id)))
    }

    async fn list_trainer_pokemon(&self, trainer_id: Id) -> StoreResult<Vec<Pokemon>> {
        let tables = self.tables.read();
        Ok(tables
            .trainer_pokemon
            .range((trainer_id, Id::MIN)..=(trainer_id, Id::MAX))
            .filter_map(|(_, pokemon_id)| tables.pokemon.get(pokemon_id))
            .cloned()
            .collect())
    }
}
