use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{AccountId, ArticleId};

/// Lifecycle state of an article. Any state is reachable from any other;
/// the only coupled side effect is the publish timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
    Scheduled,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Scheduled => "scheduled",
            ArticleStatus::Archived => "archived",
        }
    }
}

/// One content record of the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub status: ArticleStatus,
    pub publish_time: Option<DateTime<Utc>>,
    pub read_count: u64,
    pub tags: Vec<String>,
    pub account_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Materialize a draft into a stored record. The id is minted here and
    /// the read count always starts at zero.
    pub fn create(draft: ArticleDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ArticleId::generate(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            status: draft.status.unwrap_or(ArticleStatus::Draft),
            publish_time: draft.publish_time,
            read_count: 0,
            tags: draft.tags,
            account_id: draft.account_id.unwrap_or_else(AccountId::default_account),
            created_at: now,
            updated_at: now,
        }
    }

    /// Shallow merge: fields absent from the patch stay untouched, and the
    /// update timestamp is always refreshed.
    pub fn apply(&mut self, patch: ArticlePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(publish_time) = patch.publish_time {
            self.publish_time = publish_time;
        }
        if let Some(read_count) = patch.read_count {
            self.read_count = read_count;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(account_id) = patch.account_id {
            self.account_id = account_id;
        }
        self.updated_at = now;
    }
}

/// Creation payload for a new article.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub publish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

/// Allow-listed partial update. `id` and `created_at` have no slot here, so
/// a merge can never overwrite them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    /// An explicit `null` clears the timestamp; absence leaves it untouched.
    #[serde(default, deserialize_with = "double_option")]
    pub publish_time: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub read_count: Option<u64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

impl ArticlePatch {
    /// Transition to published, stamping the moment of publication.
    pub fn publish(now: DateTime<Utc>) -> Self {
        Self {
            status: Some(ArticleStatus::Published),
            publish_time: Some(Some(now)),
            ..Self::default()
        }
    }

    /// Back to draft; the publish timestamp is cleared, not kept.
    pub fn unpublish() -> Self {
        Self {
            status: Some(ArticleStatus::Draft),
            publish_time: Some(None),
            ..Self::default()
        }
    }

    /// Shelve without touching the publish timestamp.
    pub fn archive() -> Self {
        Self {
            status: Some(ArticleStatus::Archived),
            ..Self::default()
        }
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::DEFAULT_ACCOUNT_ID;
    use crate::test_utils::make_article;

    fn draft(title: &str) -> ArticleDraft {
        ArticleDraft {
            title: title.to_string(),
            content: "正文".to_string(),
            author: "作者".to_string(),
            status: None,
            publish_time: None,
            tags: vec![],
            account_id: None,
        }
    }

    #[test]
    fn status_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&ArticleStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(
            serde_json::from_str::<ArticleStatus>("\"archived\"").unwrap(),
            ArticleStatus::Archived
        );
        assert!(serde_json::from_str::<ArticleStatus>("\"review\"").is_err());
    }

    #[test]
    fn create_stamps_defaults() {
        let now = Utc::now();
        let article = Article::create(draft("标题"), now);

        assert_eq!(article.read_count, 0);
        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.created_at, now);
        assert_eq!(article.updated_at, now);
        assert_eq!(article.account_id.to_string(), DEFAULT_ACCOUNT_ID);
        assert!(article.publish_time.is_none());
    }

    #[test]
    fn every_created_article_gets_its_own_id() {
        let now = Utc::now();
        let first = Article::create(draft("甲"), now);
        let second = Article::create(draft("乙"), now);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut article = make_article("1", ArticleStatus::Draft);
        let original = article.clone();
        let later = article.updated_at + Duration::seconds(5);

        article.apply(
            ArticlePatch {
                title: Some("新标题".to_string()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(article.title, "新标题");
        assert_eq!(article.content, original.content);
        assert_eq!(article.author, original.author);
        assert_eq!(article.status, original.status);
        assert_eq!(article.created_at, original.created_at);
        assert_eq!(article.updated_at, later);
    }

    #[test]
    fn patch_null_clears_publish_time_while_absence_preserves_it() {
        let mut article = make_article("1", ArticleStatus::Published);
        let now = article.updated_at;

        let untouched: ArticlePatch = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        article.apply(untouched, now);
        assert!(article.publish_time.is_some());

        let cleared: ArticlePatch = serde_json::from_str(r#"{"publishTime":null}"#).unwrap();
        article.apply(cleared, now);
        assert!(article.publish_time.is_none());
    }

    #[test]
    fn publish_and_unpublish_patches_drive_the_timestamp() {
        let now = Utc::now();
        let mut article = make_article("1", ArticleStatus::Draft);

        article.apply(ArticlePatch::publish(now), now);
        assert_eq!(article.status, ArticleStatus::Published);
        assert_eq!(article.publish_time, Some(now));

        article.apply(ArticlePatch::unpublish(), now);
        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.publish_time, None);
    }

    #[test]
    fn archive_patch_keeps_the_publish_time() {
        let now = Utc::now();
        let mut article = make_article("1", ArticleStatus::Published);
        article.apply(ArticlePatch::archive(), now);
        assert_eq!(article.status, ArticleStatus::Archived);
        assert!(article.publish_time.is_some());
    }
}
