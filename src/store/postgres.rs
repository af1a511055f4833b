use anyhow::Context;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};

use crate::model::{
    Article, ArticleFilter, ArticleRecord, ArticleWithAuthor, EntityKind, Id, Pokemon,
    PokemonFilter, Trainer, User,
};
use crate::store::traits::{ArticleStore, PokemonStore, StoreLifecycle, TrainerStore, UserStore};
use crate::store::{StoreError, StoreResult};

const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL CHECK (title <> ''),
        content TEXT NOT NULL CHECK (content <> ''),
        version INTEGER NOT NULL DEFAULT 0,
        last_updated_at TIMESTAMPTZ NOT NULL,
        author_id BIGINT REFERENCES users (id) ON DELETE SET NULL,
        tags TEXT[] NOT NULL DEFAULT '{}'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pokemon (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        "type" TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS trainers (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS trainer_pokemon (
        trainer_id BIGINT NOT NULL REFERENCES trainers (id) ON DELETE CASCADE,
        pokemon_id BIGINT NOT NULL REFERENCES pokemon (id) ON DELETE CASCADE,
        PRIMARY KEY (trainer_id, pokemon_id)
    )
    "#,
];

const DROP_TABLES: &str = "DROP TABLE IF EXISTS trainer_pokemon, trainers, pokemon, articles, users";

const TRUNCATE_ROSTER: &str = "TRUNCATE trainer_pokemon, trainers, pokemon RESTART IDENTITY";

const ARTICLE_WITH_AUTHOR_SELECT: &str = r#"
    SELECT a.id, a.title, a.content, a.version, a.last_updated_at, a.author_id, a.tags,
           u.id AS author_user_id, u.name AS author_name
    FROM articles a
    LEFT JOIN users u ON u.id = a.author_id
"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a connection pool against the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }
}

fn article_from_row(row: &PgRow) -> Result<Article, sqlx::Error> {
    Ok(Article {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        version: row.try_get("version")?,
        last_updated_at: row.try_get("last_updated_at")?,
        author_id: row.try_get("author_id")?,
        tags: row.try_get("tags")?,
    })
}

fn article_with_author_from_row(row: &PgRow) -> Result<ArticleWithAuthor, sqlx::Error> {
    let author_id: Option<Id> = row.try_get("author_user_id")?;
    let author = match author_id {
        Some(id) => Some(User {
            id,
            name: row.try_get("author_name")?,
        }),
        None => None,
    };

    Ok(ArticleWithAuthor {
        article: article_from_row(row)?,
        author,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

fn pokemon_from_row(row: &PgRow) -> Result<Pokemon, sqlx::Error> {
    Ok(Pokemon {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        kind: row.try_get("type")?,
    })
}

fn trainer_from_row(row: &PgRow) -> Result<Trainer, sqlx::Error> {
    Ok(Trainer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

fn decode_all<T>(
    rows: &[PgRow],
    decode: fn(&PgRow) -> Result<T, sqlx::Error>,
) -> Result<Vec<T>, sqlx::Error> {
    rows.iter().map(decode).collect()
}

#[async_trait::async_trait]
impl StoreLifecycle for PostgresStore {
    async fn migrate(&self) -> StoreResult<()> {
        for statement in CREATE_TABLES {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to run schema migration")?;
        }
        Ok(())
    }

    async fn reset(&self) -> StoreResult<()> {
        sqlx::query(DROP_TABLES)
            .execute(&self.pool)
            .await
            .context("Failed to drop tables")?;
        self.migrate().await
    }

    async fn reset_roster(&self) -> StoreResult<()> {
        self.migrate().await?;
        sqlx::query(TRUNCATE_ROSTER)
            .execute(&self.pool)
            .await
            .context("Failed to truncate pokemon and trainers")?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl ArticleStore for PostgresStore {
    async fn insert_article(&self, record: ArticleRecord) -> StoreResult<Article> {
        let row = sqlx::query(
            r#"
            INSERT INTO articles (title, content, version, last_updated_at, author_id, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, content, version, last_updated_at, author_id, tags
            "#,
        )
        .bind(&record.title)
        .bind(&record.content)
        .bind(record.version)
        .bind(record.last_updated_at)
        .bind(record.author_id)
        .bind(&record.tags)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert article")?;

        Ok(article_from_row(&row).context("Failed to decode article")?)
    }

    async fn get_article(&self, id: Id) -> StoreResult<Option<Article>> {
        let row = sqlx::query(
            "SELECT id, title, content, version, last_updated_at, author_id, tags FROM articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch article")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(article_from_row(&row).context("Failed to decode article")?))
    }

    async fn list_articles(&self, filter: Option<&ArticleFilter>) -> StoreResult<Vec<Article>> {
        let filter = filter.cloned().unwrap_or_default();
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, version, last_updated_at, author_id, tags
            FROM articles
            WHERE ($1::TEXT IS NULL OR title = $1)
              AND ($2::BIGINT IS NULL OR author_id = $2)
            ORDER BY id
            "#,
        )
        .bind(filter.title)
        .bind(filter.author_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list articles")?;

        Ok(decode_all(&rows, article_from_row).context("Failed to decode articles")?)
    }

    async fn update_article(&self, article: &Article, expected_version: i32) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE articles SET
                title = $2,
                content = $3,
                version = $4,
                last_updated_at = $5,
                author_id = $6,
                tags = $7
            WHERE id = $1 AND version = $8
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.version)
        .bind(article.last_updated_at)
        .bind(article.author_id)
        .bind(&article.tags)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .context("Failed to update article")?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_article_author(&self, id: Id, author_id: Option<Id>) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE articles SET author_id = $2 WHERE id = $1")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .context("Failed to set article author")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_article(&self, id: Id) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete article")?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_articles_with_author(
        &self,
        filter: Option<&ArticleFilter>,
    ) -> StoreResult<Vec<ArticleWithAuthor>> {
        let filter = filter.cloned().unwrap_or_default();
        let sql = format!(
            "{} WHERE ($1::TEXT IS NULL OR a.title = $1) AND ($2::BIGINT IS NULL OR a.author_id = $2) ORDER BY a.id",
            ARTICLE_WITH_AUTHOR_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(filter.title)
            .bind(filter.author_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list articles with author")?;

        Ok(decode_all(&rows, article_with_author_from_row)
            .context("Failed to decode articles with author")?)
    }

    async fn get_article_with_author(&self, id: Id) -> StoreResult<Option<ArticleWithAuthor>> {
        let sql = format!("{} WHERE a.id = $1", ARTICLE_WITH_AUTHOR_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch article with author")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(
            article_with_author_from_row(&row).context("Failed to decode article with author")?,
        ))
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, name: Option<String>) -> StoreResult<User> {
        let row = sqlx::query("INSERT INTO users (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert user")?;

        Ok(user_from_row(&row).context("Failed to decode user")?)
    }

    async fn get_user(&self, id: Id) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT id, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(user_from_row(&row).context("Failed to decode user")?))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query("SELECT id, name FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users")?;

        Ok(decode_all(&rows, user_from_row).context("Failed to decode users")?)
    }

    async fn delete_user(&self, id: Id) -> StoreResult<bool> {
        // articles.author_id is cleared through ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl PokemonStore for PostgresStore {
    async fn insert_pokemon(&self, name: &str, kind: &str) -> StoreResult<Pokemon> {
        let row = sqlx::query(
            r#"INSERT INTO pokemon (name, "type") VALUES ($1, $2) RETURNING id, name, "type""#,
        )
        .bind(name)
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert pokemon")?;

        Ok(pokemon_from_row(&row).context("Failed to decode pokemon")?)
    }

    async fn get_pokemon(&self, id: Id) -> StoreResult<Option<Pokemon>> {
        let row = sqlx::query(r#"SELECT id, name, "type" FROM pokemon WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch pokemon")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(pokemon_from_row(&row).context("Failed to decode pokemon")?))
    }

    async fn list_pokemon(&self, filter: Option<&PokemonFilter>) -> StoreResult<Vec<Pokemon>> {
        let filter = filter.cloned().unwrap_or_default();
        let rows = sqlx::query(
            r#"
            SELECT id, name, "type"
            FROM pokemon
            WHERE ($1::TEXT IS NULL OR name = $1)
              AND ($2::TEXT IS NULL OR "type" = $2)
            ORDER BY id
            "#,
        )
        .bind(filter.name)
        .bind(filter.kind)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list pokemon")?;

        Ok(decode_all(&rows, pokemon_from_row).context("Failed to decode pokemon")?)
    }

    async fn delete_pokemon(&self, id: Id) -> StoreResult<bool> {
        // trainer_pokemon rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM pokemon WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete pokemon")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl TrainerStore for PostgresStore {
    async fn insert_trainer(&self, name: &str) -> StoreResult<Trainer> {
        let row = sqlx::query("INSERT INTO trainers (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(|db| db.is_unique_violation())
                {
                    StoreError::UniqueViolation {
                        entity: EntityKind::Trainer,
                        field: "name",
                    }
                } else {
                    StoreError::Other(anyhow::Error::new(e).context("Failed to insert trainer"))
                }
            })?;

        Ok(trainer_from_row(&row).context("Failed to decode trainer")?)
    }

    async fn get_trainer(&self, id: Id) -> StoreResult<Option<Trainer>> {
        let row = sqlx::query("SELECT id, name FROM trainers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch trainer")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(trainer_from_row(&row).context("Failed to decode trainer")?))
    }

    async fn list_trainers(&self) -> StoreResult<Vec<Trainer>> {
        let rows = sqlx::query("SELECT id, name FROM trainers ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list trainers")?;

        Ok(decode_all(&rows, trainer_from_row).context("Failed to decode trainers")?)
    }

    async fn delete_trainer(&self, id: Id) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM trainers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete trainer")?;

        Ok(result.rows_affected() > 0)
    }

    async fn link_pokemon(&self, trainer_id: Id, pokemon_id: Id) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO trainer_pokemon (trainer_id, pokemon_id)
            VALUES ($1, $2)
            ON CONFLICT (trainer_id, pokemon_id) DO NOTHING
            "#,
        )
        .bind(trainer_id)
        .bind(pokemon_id)
        .execute(&self.pool)
        .await
        .context("Failed to link pokemon to trainer")?;

        Ok(result.rows_affected() > 0)
    }

    async fn unlink_pokemon(&self, trainer_id: Id, pokemon_id: Id) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM trainer_pokemon WHERE trainer_id = $1 AND pokemon_id = $2")
                .bind(trainer_id)
                .bind(pokemon_id)
                .execute(&self.pool)
                .await
                .context("Failed to unlink pokemon from trainer")?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_trainer_pokemon(&self, trainer_id: Id) -> StoreResult<Vec<Pokemon>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p."type"
            FROM trainer_pokemon tp
            JOIN pokemon p ON p.id = tp.pokemon_id
            WHERE tp.trainer_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list trainer pokemon")?;

        Ok(decode_all(&rows, pokemon_from_row).context("Failed to decode pokemon")?)
    }
}
