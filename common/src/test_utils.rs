use chrono::Utc;

use crate::domain::{AccountId, Article, ArticleId, ArticleStatus};

/// Hand-rolled record for tests, with a publish time iff the status says
/// published.
///
/// Public so that other crates can reuse it for their own tests.
pub fn make_article(id: &str, status: ArticleStatus) -> Article {
    let now = Utc::now();
    Article {
        id: ArticleId::try_new(id).unwrap(),
        title: format!("文章 {id}"),
        content: format!("正文 {id}"),
        author: "测试作者".to_string(),
        status,
        publish_time: (status == ArticleStatus::Published).then_some(now),
        read_count: 0,
        tags: vec![],
        account_id: AccountId::try_new("account1").unwrap(),
        created_at: now,
        updated_at: now,
    }
}
