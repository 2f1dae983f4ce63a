use std::cmp::Ordering;

use wemp_common::Article;

use crate::domain::repository::query::{ArticleQuery, Page, Pagination, SortField, SortOrder};

/// Filter, sort and slice the collection according to `query`. Filters
/// combine with AND; the slice is `[(page-1)*limit, (page-1)*limit+limit)`.
pub(crate) fn run(articles: &[Article], query: &ArticleQuery) -> Page<Article> {
    let mut matched: Vec<Article> = articles
        .iter()
        .filter(|article| matches(article, query))
        .cloned()
        .collect();

    matched.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_by);
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let pagination = Pagination::window(query.page, query.limit, matched.len());
    let start = (query.page as usize)
        .saturating_sub(1)
        .saturating_mul(query.limit as usize);
    let data = matched
        .into_iter()
        .skip(start)
        .take(query.limit as usize)
        .collect();

    Page { data, pagination }
}

fn matches(article: &Article, query: &ArticleQuery) -> bool {
    if let Some(needle) = &query.search {
        let needle = needle.to_lowercase();
        let hit = article.title.to_lowercase().contains(&needle)
            || article.content.to_lowercase().contains(&needle)
            || article.author.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }
    if let Some(status) = &query.status {
        if article.status.as_str() != status {
            return false;
        }
    }
    if let Some(account_id) = &query.account_id {
        if article.account_id.as_ref() != account_id {
            return false;
        }
    }
    true
}

/// Total order per sort field. Missing publish times sort before any
/// timestamp; equal keys keep their current relative order.
fn compare(a: &Article, b: &Article, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.cmp(&b.title),
        SortField::Author => a.author.cmp(&b.author),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::ReadCount => a.read_count.cmp(&b.read_count),
        SortField::PublishTime => a.publish_time.cmp(&b.publish_time),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use wemp_common::test_utils::make_article;
    use wemp_common::ArticleStatus;

    use super::*;

    /// Two published articles and one draft, with staggered timestamps.
    fn corpus() -> Vec<Article> {
        let base = Utc.with_ymd_and_hms(2025, 11, 1, 10, 0, 0).unwrap();

        let mut one = make_article("1", ArticleStatus::Published);
        one.title = "如何提升公众号内容质量".to_string();
        one.author = "张三".to_string();
        one.publish_time = Some(base);
        one.updated_at = base;

        let mut two = make_article("2", ArticleStatus::Published);
        two.title = "AI工具在内容创作中的应用".to_string();
        two.author = "李四".to_string();
        two.publish_time = Some(base + Duration::hours(1));
        two.updated_at = base + Duration::hours(1);

        let mut three = make_article("3", ArticleStatus::Draft);
        three.title = "微信公众号排版技巧".to_string();
        three.author = "王五".to_string();
        three.updated_at = base + Duration::hours(2);

        vec![one, two, three]
    }

    #[test]
    fn search_matches_title_content_or_author_case_insensitively() {
        let articles = corpus();

        let by_title = run(&articles, &ArticleQuery::new().search("ai"));
        assert_eq!(by_title.data.len(), 1);
        assert_eq!(by_title.data[0].id.to_string(), "2");

        let by_author = run(&articles, &ArticleQuery::new().search("张三"));
        assert_eq!(by_author.data.len(), 1);
        assert_eq!(by_author.data[0].id.to_string(), "1");

        let no_hit = run(&articles, &ArticleQuery::new().search("区块链"));
        assert!(no_hit.data.is_empty());
    }

    #[test]
    fn filters_combine_with_and() {
        let articles = corpus();
        let page = run(
            &articles,
            &ArticleQuery::new().with_status("published").with_account("account1"),
        );
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id.to_string(), "1");
    }

    #[test]
    fn all_sentinel_returns_the_whole_collection() {
        let articles = corpus();
        let page = run(
            &articles,
            &ArticleQuery::new().with_status("all").with_account("all"),
        );
        assert_eq!(page.pagination.total, 3);
    }

    #[test]
    fn unrecognised_status_matches_nothing() {
        let articles = corpus();
        let page = run(&articles, &ArticleQuery::new().with_status("review"));
        assert_eq!(page.pagination.total, 0);
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[test]
    fn filtering_twice_equals_filtering_once() {
        let articles = corpus();
        let query = ArticleQuery::new().with_status("published");

        let once = run(&articles, &query);
        let twice = run(&once.data, &query);

        assert_eq!(once.data, twice.data);
    }

    #[test]
    fn default_sort_is_updated_at_descending() {
        let articles = corpus();
        let page = run(&articles, &ArticleQuery::new());
        let ids: Vec<String> = page.data.iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn missing_publish_time_sorts_before_any_timestamp() {
        let articles = corpus();

        let ascending = run(
            &articles,
            &ArticleQuery::new().order_by(SortField::PublishTime, SortOrder::Asc),
        );
        assert_eq!(ascending.data[0].id.to_string(), "3");

        let descending = run(
            &articles,
            &ArticleQuery::new().order_by(SortField::PublishTime, SortOrder::Desc),
        );
        assert_eq!(descending.data[0].id.to_string(), "2");
        assert_eq!(descending.data[2].id.to_string(), "3");
    }

    #[test]
    fn published_filter_with_page_size_one_reports_two_pages() {
        let articles = corpus();
        let page = run(
            &articles,
            &ArticleQuery::new().with_status("published").paginate(1, 1),
        );

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_next);
        assert!(!page.pagination.has_prev);
    }

    #[test]
    fn page_beyond_range_is_empty_with_accurate_totals() {
        let articles = corpus();
        let page = run(&articles, &ArticleQuery::new().paginate(9, 20));

        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn pages_partition_the_filtered_set() {
        let articles = corpus();
        let first = run(&articles, &ArticleQuery::new().paginate(1, 2));

        let mut seen: Vec<String> = first.data.iter().map(|a| a.id.to_string()).collect();
        for page in 2..=first.pagination.total_pages {
            let next = run(&articles, &ArticleQuery::new().paginate(page, 2));
            seen.extend(next.data.iter().map(|a| a.id.to_string()));
        }

        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), articles.len());
    }
}
