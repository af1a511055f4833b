use crate::model::{Id, Timestamp, User};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Number of content characters kept by the `snippet` accessor.
pub const SNIPPET_LENGTH: usize = 23;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Id,
    pub title: String,
    pub content: String,
    /// Starts at 0, bumped by exactly one on every content-affecting save
    pub version: i32,
    pub last_updated_at: Timestamp,
    /// Weak reference to the `User` acting as author
    pub author_id: Option<Id>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Article {
    /// First 23 characters of the content followed by `...`. Never stored.
    pub fn snippet(&self) -> String {
        let head: String = self.content.chars().take(SNIPPET_LENGTH).collect();
        format!("{}...", head)
    }

    /// Shortens the in-memory content to `length` characters without saving.
    /// Lengths beyond the content are clamped.
    pub fn truncate(&mut self, length: usize) {
        if let Some((byte_index, _)) = self.content.char_indices().nth(length) {
            self.content.truncate(byte_index);
        }
    }

    /// Tags as a single comma separated string.
    pub fn joined_tags(&self) -> String {
        self.tags.iter().join(", ")
    }

    /// True when any column written by `save` differs between the two rows.
    pub fn differs_from(&self, stored: &Article) -> bool {
        self.title != stored.title
            || self.content != stored.content
            || self.tags != stored.tags
            || self.author_id != stored.author_id
    }
}

/// Create payload. Every field is optional at the type level so that
/// missing values reach validation instead of failing deserialization.
/// Authors are attached afterwards through `Associations::set_author`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = Some(tags.iter().map(|t| t.to_string()).collect());
        self
    }
}

/// A validated article that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub title: String,
    pub content: String,
    pub version: i32,
    pub last_updated_at: Timestamp,
    pub author_id: Option<Id>,
    pub tags: Vec<String>,
}

impl ArticleRecord {
    pub fn into_article(self, id: Id) -> Article {
        Article {
            id,
            title: self.title,
            content: self.content,
            version: self.version,
            last_updated_at: self.last_updated_at,
            author_id: self.author_id,
            tags: self.tags,
        }
    }
}

/// Update payload. Absent fields keep their stored value; `Some(None)`
/// records an explicit `null`, which validation rejects for required fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(
        default,
        deserialize_with = "crate::model::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "crate::model::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ArticlePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(Some(title.into())),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(Some(content.into())),
            ..Default::default()
        }
    }

    /// Assigns every present, non-null field. Null fields are left for
    /// validation to report.
    pub fn apply_to(self, article: &mut Article) {
        if let Some(Some(title)) = self.title {
            article.title = title;
        }
        if let Some(Some(content)) = self.content {
            article.content = content;
        }
        if let Some(tags) = self.tags {
            article.tags = tags;
        }
    }
}

/// Exact-match filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<Id>,
}

impl ArticleFilter {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author_id: None,
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.title.as_ref().map_or(true, |t| &article.title == t)
            && self.author_id.map_or(true, |a| article.author_id == Some(a))
    }
}

/// Article read together with its author in one logical read.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleWithAuthor {
    pub article: Article,
    pub author: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::now;

    const FULL_TEXT: &str = "The South African cliff swallow (Petrochelidon spilodera), also known as the South African swallow, is a species of bird in the Hirundinidae family.";

    fn article(content: &str) -> Article {
        Article {
            id: 1,
            title: "Migratory Birds".to_string(),
            content: content.to_string(),
            version: 0,
            last_updated_at: now(),
            author_id: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_snippet_takes_23_characters() {
        let a = article(FULL_TEXT);
        assert_eq!(a.snippet(), "The South African cliff...");
        assert_eq!(a.content, FULL_TEXT);
    }

    #[test]
    fn test_truncate_shortens_content_only() {
        let mut a = article(FULL_TEXT);
        let before = a.last_updated_at;
        a.truncate(12);
        assert_eq!(a.content, "The South Af");
        assert_eq!(a.version, 0);
        assert_eq!(a.last_updated_at, before);

        let mut b = article(FULL_TEXT);
        b.truncate(0);
        assert_eq!(b.content, "");
    }

    #[test]
    fn test_truncate_clamps_long_lengths() {
        let mut a = article("short");
        a.truncate(500);
        assert_eq!(a.content, "short");

        let mut wall_e = article("WALL·E robot");
        wall_e.truncate(6);
        assert_eq!(wall_e.content, "WALL·E");
        assert_eq!(wall_e.content.chars().count(), 6);
    }

    #[test]
    fn test_joined_tags() {
        let mut a = article("So Taggy");
        a.tags = vec!["tag1".into(), "tag2".into(), "tag3".into()];
        assert_eq!(a.joined_tags(), "tag1, tag2, tag3");
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut a = article(FULL_TEXT);
        ArticlePatch::title("Awesome PUT-Updated Article").apply_to(&mut a);
        assert_eq!(a.title, "Awesome PUT-Updated Article");
        assert_eq!(a.content, FULL_TEXT);
    }

    #[test]
    fn test_filter_is_exact_match() {
        let a = article(FULL_TEXT);
        assert!(ArticleFilter::default().matches(&a));
        assert!(ArticleFilter::by_title("Migratory Birds").matches(&a));
        assert!(!ArticleFilter::by_title("Migratory").matches(&a));
    }

    #[test]
    fn test_new_article_deserializes_missing_fields() {
        let draft: NewArticle =
            serde_json::from_str(r#"{"title": "This Article Should Not Be Allowed"}"#).unwrap();
        assert_eq!(draft.content, None);
        assert_eq!(draft.tags, None);
    }

    #[test]
    fn test_patch_tells_null_from_absent() {
        let patch: ArticlePatch = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(patch.title, Some(None));
        assert_eq!(patch.content, None);

        let patch: ArticlePatch = serde_json::from_str(r#"{"content": "Fresh"}"#).unwrap();
        assert_eq!(patch, ArticlePatch::content("Fresh"));

        let mut a = article(FULL_TEXT);
        ArticlePatch {
            title: Some(None),
            ..Default::default()
        }
        .apply_to(&mut a);
        assert_eq!(a.title, "Migratory Birds");
    }
}
