//! Pre-save stamping for versioned articles. `ArticleModel::create` and
//! `ArticleModel::save` call these explicitly before touching the store.

use crate::model::{next_timestamp, now, Article, ArticleRecord, NewArticle};

pub const INITIAL_VERSION: i32 = 0;

/// Turns a validated draft into the row to insert: version 0, stamped now.
pub fn stamp_insert(draft: NewArticle) -> ArticleRecord {
    ArticleRecord {
        title: draft.title.unwrap_or_default(),
        content: draft.content.unwrap_or_default(),
        version: INITIAL_VERSION,
        last_updated_at: now(),
        author_id: None,
        tags: draft.tags.unwrap_or_default(),
    }
}

/// Bumps the version of `article` one past the stored row and refreshes
/// `last_updated_at` so that it sorts strictly after the stored value.
pub fn stamp_update(article: &mut Article, stored: &Article) {
    article.version = stored.version + 1;
    article.last_updated_at = next_timestamp(stored.last_updated_at);
}
