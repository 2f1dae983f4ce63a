use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;
use wemp_common::{Article, ArticleStatus};

/// Aggregates over the live collection. Every number is a fold over the
/// records the CRUD pipeline maintains; nothing here is sampled or cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total: usize,
    pub published: usize,
    pub draft: usize,
    pub scheduled: usize,
    pub archived: usize,
    pub total_read_count: u64,
    pub accounts: Vec<AccountStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub account_id: String,
    pub total: usize,
    pub published: usize,
    pub avg_read_count: u64,
}

pub fn collect(articles: &[Article]) -> CollectionStats {
    let by_status = articles.iter().counts_by(|article| article.status);

    let accounts = articles
        .iter()
        .into_group_map_by(|article| article.account_id.clone())
        .into_iter()
        .map(|(account_id, group)| {
            let published = group
                .iter()
                .filter(|article| article.status == ArticleStatus::Published)
                .count();
            let reads: u64 = group.iter().map(|article| article.read_count).sum();
            AccountStats {
                account_id: account_id.into_inner(),
                total: group.len(),
                published,
                avg_read_count: reads / group.len() as u64,
            }
        })
        .sorted_by(|a, b| a.account_id.cmp(&b.account_id))
        .collect();

    CollectionStats {
        total: articles.len(),
        published: status_count(&by_status, ArticleStatus::Published),
        draft: status_count(&by_status, ArticleStatus::Draft),
        scheduled: status_count(&by_status, ArticleStatus::Scheduled),
        archived: status_count(&by_status, ArticleStatus::Archived),
        total_read_count: articles.iter().map(|article| article.read_count).sum(),
        accounts,
    }
}

fn status_count(by_status: &HashMap<ArticleStatus, usize>, status: ArticleStatus) -> usize {
    by_status.get(&status).copied().unwrap_or(0)
}
