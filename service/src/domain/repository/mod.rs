use std::future::Future;

use wemp_common::{Article, ArticleDraft, ArticleId, ArticlePatch};

use crate::domain::repository::query::{ArticleQuery, Page};

pub mod query;

/// Port over the article collection. The demo backs it with an in-memory
/// adapter; a real store implements the same contract.
///
/// No atomicity is promised across calls: two overlapping bulk requests may
/// interleave between ids, exactly like concurrent requests against a single
/// shared array would.
pub trait ArticleRepository: Clone + Send + Sync + 'static {
    /// Filter, sort and paginate the collection.
    fn find(
        &self,
        query: ArticleQuery,
    ) -> impl Future<Output = Result<Page<Article>, RepositoryError>> + Send;

    /// Look up a single article.
    fn find_by_id(
        &self,
        id: ArticleId,
    ) -> impl Future<Output = Result<Option<Article>, RepositoryError>> + Send;

    /// Store a new article at the head of the collection.
    fn insert(
        &self,
        draft: ArticleDraft,
    ) -> impl Future<Output = Result<Article, RepositoryError>> + Send;

    /// Merge a partial update over an existing article.
    fn update(
        &self,
        id: ArticleId,
        patch: ArticlePatch,
    ) -> impl Future<Output = Result<Article, RepositoryError>> + Send;

    /// Remove an article. No timestamp stamping applies.
    fn delete(&self, id: ArticleId) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Full snapshot of the collection, in storage order.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Article>, RepositoryError>> + Send;
}

#[derive(Debug)]
pub enum RepositoryError {
    NotFound,
    ValidationFailed(String),
}
