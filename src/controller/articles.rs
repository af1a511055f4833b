use std::sync::Arc;

use crate::controller::Acknowledged;
use crate::error::{MissingRecord, ModelError, ModelResult};
use crate::logic::{ArticleModel, Associations, UserModel};
use crate::model::{Article, ArticleFilter, ArticlePatch, ArticleWithAuthor, EntityKind, Id, NewArticle};
use crate::store::traits::Store;

pub struct ArticleController<S: Store> {
    store: Arc<S>,
}

impl<S: Store> ArticleController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: Option<ArticleFilter>) -> ModelResult<Vec<Article>> {
        ArticleModel::find_all(&*self.store, filter.as_ref()).await
    }

    pub async fn list_with_author(
        &self,
        filter: Option<ArticleFilter>,
    ) -> ModelResult<Vec<ArticleWithAuthor>> {
        Associations::find_articles_with_author(&*self.store, filter.as_ref()).await
    }

    pub async fn get(&self, id: Id) -> ModelResult<Article> {
        ArticleModel::find_by_id(&*self.store, id).await
    }

    pub async fn get_with_author(&self, id: Id) -> ModelResult<ArticleWithAuthor> {
        Associations::find_article_with_author(&*self.store, id).await
    }

    pub async fn create(&self, payload: NewArticle) -> ModelResult<Acknowledged<Article>> {
        let article = ArticleModel::create(&*self.store, payload).await?;
        Ok(Acknowledged::created(article))
    }

    pub async fn update(
        &self,
        id: Id,
        payload: ArticlePatch,
    ) -> ModelResult<Acknowledged<Article>> {
        let article = ArticleModel::update(&*self.store, id, payload).await?;
        Ok(Acknowledged::updated(article))
    }

    pub async fn delete(&self, id: Id) -> ModelResult<()> {
        let article = ArticleModel::find_by_id(&*self.store, id).await?;
        ArticleModel::destroy(&*self.store, &article).await
    }

    /// Link (or with `None`, unlink) the article's author. Both records are
    /// fetched independently and the link is only written once both exist.
    pub async fn set_author(
        &self,
        article_id: Id,
        user_id: Option<Id>,
    ) -> ModelResult<ArticleWithAuthor> {
        let store = &*self.store;
        let (article, user) = tokio::join!(ArticleModel::find_by_id(store, article_id), async {
            match user_id {
                Some(id) => UserModel::find_by_id(store, id).await.map(Some),
                None => Ok(None),
            }
        });

        let mut missing = Vec::new();
        let article = keep_found(article, EntityKind::Article, article_id, &mut missing)?;
        let user = match user_id {
            Some(id) => keep_found(user, EntityKind::User, id, &mut missing)?.flatten(),
            None => user?,
        };
        let Some(mut article) = article else {
            return Err(ModelError::Association { missing });
        };
        if !missing.is_empty() {
            return Err(ModelError::Association { missing });
        }

        Associations::set_author(store, &mut article, user.as_ref()).await?;
        Associations::find_article_with_author(store, article.id).await
    }
}

/// Records a lookup miss instead of failing right away, so that both sides
/// of a relation are reported together. Other errors still propagate.
pub(crate) fn keep_found<T>(
    lookup: ModelResult<T>,
    entity: EntityKind,
    id: Id,
    missing: &mut Vec<MissingRecord>,
) -> ModelResult<Option<T>> {
    match lookup {
        Ok(found) => Ok(Some(found)),
        Err(ModelError::NotFound { .. }) => {
            missing.push(MissingRecord { entity, id });
            Ok(None)
        }
        Err(other) => Err(other),
    }
}
