use serde::Serialize;

use crate::controller::Acknowledged;
use crate::model::{Article, ArticleWithAuthor, Id, Timestamp, User};

/// Wire shape of an article. Derived fields are computed on the way out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub snippet: String,
    pub version: i32,
    pub last_updated_at: Timestamp,
    pub author_id: Option<Id>,
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        Self {
            snippet: article.snippet(),
            tags: article.joined_tags(),
            id: article.id,
            title: article.title,
            content: article.content,
            version: article.version,
            last_updated_at: article.last_updated_at,
            author_id: article.author_id,
            author: None,
        }
    }
}

impl From<ArticleWithAuthor> for ArticleView {
    fn from(loaded: ArticleWithAuthor) -> Self {
        let mut view = ArticleView::from(loaded.article);
        view.author = loaded.author;
        view
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleEnvelope {
    pub message: &'static str,
    pub article: ArticleView,
}

impl From<Acknowledged<Article>> for ArticleEnvelope {
    fn from(ack: Acknowledged<Article>) -> Self {
        Self {
            message: ack.message,
            article: ack.entity.into(),
        }
    }
}

/// Simple health check payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
