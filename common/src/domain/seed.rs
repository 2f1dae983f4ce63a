use chrono::{DateTime, Utc};

use crate::domain::{AccountId, Article, ArticleId, ArticleStatus};

/// The demo corpus every fresh process starts from: two published articles
/// and one draft. Creation timestamps are stamped at seed time, matching a
/// collection that was just brought to life.
pub fn sample_articles() -> Vec<Article> {
    let now = Utc::now();
    vec![
        Article {
            id: seed_id("1"),
            title: "如何提升公众号内容质量".to_string(),
            content: "这是一个关于提升内容质量的文章内容...".to_string(),
            author: "张三".to_string(),
            status: ArticleStatus::Published,
            publish_time: Some(seed_time("2025-11-01T10:00:00Z")),
            read_count: 1250,
            tags: vec!["内容创作".to_string(), "公众号运营".to_string()],
            account_id: seed_account("account1"),
            created_at: now,
            updated_at: now,
        },
        Article {
            id: seed_id("2"),
            title: "AI工具在内容创作中的应用".to_string(),
            content: "AI工具如何帮助我们更好地创作内容...".to_string(),
            author: "李四".to_string(),
            status: ArticleStatus::Published,
            publish_time: Some(seed_time("2025-11-05T14:30:00Z")),
            read_count: 890,
            tags: vec!["AI".to_string(), "工具".to_string(), "效率".to_string()],
            account_id: seed_account("account2"),
            created_at: now,
            updated_at: now,
        },
        Article {
            id: seed_id("3"),
            title: "微信公众号排版技巧".to_string(),
            content: "让您的文章看起来更专业的排版技巧...".to_string(),
            author: "王五".to_string(),
            status: ArticleStatus::Draft,
            publish_time: None,
            read_count: 0,
            tags: vec!["排版".to_string(), "设计".to_string()],
            account_id: seed_account("account1"),
            created_at: now,
            updated_at: now,
        },
    ]
}

fn seed_id(raw: &str) -> ArticleId {
    ArticleId::try_new(raw).expect("seed ids are non-empty")
}

fn seed_account(raw: &str) -> AccountId {
    AccountId::try_new(raw).expect("seed account ids are non-empty")
}

fn seed_time(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("seed timestamps are valid rfc3339")
}
