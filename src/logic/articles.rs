use log::{debug, info, warn};

use crate::error::{ModelError, ModelResult};
use crate::logic::validate::Validate;
use crate::logic::versioning;
use crate::model::{Article, ArticleFilter, ArticlePatch, EntityKind, Id, NewArticle};
use crate::store::traits::ArticleStore;

pub struct ArticleModel;

impl ArticleModel {
    /// Validate and persist a new article at version 0
    pub async fn create<S: ArticleStore>(store: &S, draft: NewArticle) -> ModelResult<Article> {
        draft.validate()?;
        let article = store.insert_article(versioning::stamp_insert(draft)).await?;
        info!("Created article {} '{}'", article.id, article.title);
        Ok(article)
    }

    pub async fn find_by_id<S: ArticleStore>(store: &S, id: Id) -> ModelResult<Article> {
        store
            .get_article(id)
            .await?
            .ok_or_else(|| ModelError::not_found(EntityKind::Article, id))
    }

    pub async fn find_all<S: ArticleStore>(
        store: &S,
        filter: Option<&ArticleFilter>,
    ) -> ModelResult<Vec<Article>> {
        Ok(store.list_articles(filter).await?)
    }

    /// Single article with exactly this title. When several share the
    /// title the lowest id wins.
    pub async fn find_by_title<S: ArticleStore>(store: &S, title: &str) -> ModelResult<Article> {
        store
            .list_articles(Some(&ArticleFilter::by_title(title)))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::not_found(EntityKind::Article, title))
    }

    /// Persist field assignments made on a loaded article. A save that
    /// changes nothing returns the stored row untouched. The write only
    /// lands while the row is still at the version `article` was loaded at.
    pub async fn save<S: ArticleStore>(store: &S, mut article: Article) -> ModelResult<Article> {
        article.validate()?;

        let stored = Self::find_by_id(store, article.id).await?;
        if article.version != stored.version {
            return Err(Self::conflict(&article, stored.version));
        }
        if !article.differs_from(&stored) {
            debug!("Article {} unchanged, skipping save", article.id);
            return Ok(stored);
        }

        let expected = stored.version;
        versioning::stamp_update(&mut article, &stored);
        if !store.update_article(&article, expected).await? {
            // Lost the race between the read above and the write
            let current = Self::find_by_id(store, article.id).await?;
            article.version = expected;
            return Err(Self::conflict(&article, current.version));
        }

        info!("Saved article {} at version {}", article.id, article.version);
        Ok(article)
    }

    /// Load, apply the patch, re-validate and save
    pub async fn update<S: ArticleStore>(
        store: &S,
        id: Id,
        patch: ArticlePatch,
    ) -> ModelResult<Article> {
        let mut article = Self::find_by_id(store, id).await?;
        patch.validate()?;
        patch.apply_to(&mut article);
        Self::save(store, article).await
    }

    fn conflict(article: &Article, found: i32) -> ModelError {
        warn!(
            "Article {} is stale: loaded at version {}, stored at {}",
            article.id, article.version, found
        );
        ModelError::Conflict {
            entity: EntityKind::Article,
            id: article.id,
            expected: article.version,
            found,
        }
    }

    pub async fn destroy<S: ArticleStore>(store: &S, article: &Article) -> ModelResult<()> {
        if !store.delete_article(article.id).await? {
            return Err(ModelError::not_found(EntityKind::Article, article.id));
        }
        info!("Deleted article {}", article.id);
        Ok(())
    }
}
