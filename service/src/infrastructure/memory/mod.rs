use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use wemp_common::{Article, ArticleDraft, ArticleId, ArticlePatch};

use crate::domain::repository::query::{ArticleQuery, Page};
use crate::domain::repository::{ArticleRepository, RepositoryError};

mod query;

/// Process-local article store. The lock scopes each call and is never held
/// across awaits, so concurrent requests interleave between calls the same
/// way they would against a single shared array. Contents are discarded on
/// process restart.
#[derive(Clone, Default)]
pub struct InMemoryArticleRepository {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl InMemoryArticleRepository {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store pre-populated with the given records, in the given order.
    pub fn seeded(articles: Vec<Article>) -> Self {
        Self {
            articles: Arc::new(RwLock::new(articles)),
        }
    }
}

impl ArticleRepository for InMemoryArticleRepository {
    async fn find(&self, query: ArticleQuery) -> Result<Page<Article>, RepositoryError> {
        let articles = self.articles.read().await;
        Ok(query::run(&articles, &query))
    }

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, RepositoryError> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|article| article.id == id).cloned())
    }

    async fn insert(&self, draft: ArticleDraft) -> Result<Article, RepositoryError> {
        let article = Article::create(draft, Utc::now());
        let mut articles = self.articles.write().await;
        // Most-recent-first is the creation-time convention, independent of
        // any later sort.
        articles.insert(0, article.clone());
        Ok(article)
    }

    async fn update(&self, id: ArticleId, patch: ArticlePatch) -> Result<Article, RepositoryError> {
        let mut articles = self.articles.write().await;
        let article = articles
            .iter_mut()
            .find(|article| article.id == id)
            .ok_or(RepositoryError::NotFound)?;
        article.apply(patch, Utc::now());
        Ok(article.clone())
    }

    async fn delete(&self, id: ArticleId) -> Result<(), RepositoryError> {
        let mut articles = self.articles.write().await;
        let index = articles
            .iter()
            .position(|article| article.id == id)
            .ok_or(RepositoryError::NotFound)?;
        articles.remove(index);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Article>, RepositoryError> {
        Ok(self.articles.read().await.clone())
    }
}
