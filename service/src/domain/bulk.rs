use chrono::Utc;
use serde::{Deserialize, Serialize};
use wemp_common::{AccountId, ArticleId, ArticlePatch};

use crate::domain::repository::{ArticleRepository, RepositoryError};

const MSG_NOT_FOUND: &str = "文章不存在";
const MSG_FAILED: &str = "操作失败";

/// Actions accepted by the bulk endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Publish,
    Unpublish,
    Draft,
    Delete,
    Archive,
    UpdateTags,
    UpdateAccount,
}

impl BulkAction {
    /// Wire names are snake_case verbs; anything else is reported per id.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "publish" => Some(Self::Publish),
            "unpublish" => Some(Self::Unpublish),
            "draft" => Some(Self::Draft),
            "delete" => Some(Self::Delete),
            "archive" => Some(Self::Archive),
            "update_tags" => Some(Self::UpdateTags),
            "update_account" => Some(Self::UpdateAccount),
            _ => None,
        }
    }
}

/// Shared mutation payload for `update_tags` / `update_account`. A missing
/// field turns the action into a counted no-op.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPayload {
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkItemError {
    pub id: String,
    pub message: String,
}

/// Outcome counters of one bulk run. `total` always equals the number of
/// submitted ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    pub errors: Vec<BulkItemError>,
}

impl BulkReport {
    fn ok(&mut self) {
        self.success += 1;
    }

    fn fail(&mut self, id: &str, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(BulkItemError {
            id: id.to_string(),
            message: message.into(),
        });
    }
}

/// Apply `action` to every id in order. Per-id isolation is the contract:
/// one id's failure is recorded, never propagated, and processing always
/// continues with the remaining ids.
pub async fn run_bulk<R: ArticleRepository>(
    repo: &R,
    ids: &[String],
    action: &str,
    payload: &BulkPayload,
) -> BulkReport {
    let parsed = BulkAction::parse(action);
    let mut report = BulkReport {
        total: ids.len(),
        ..Default::default()
    };

    for raw_id in ids {
        let Ok(id) = ArticleId::try_new(raw_id) else {
            report.fail(raw_id, MSG_NOT_FOUND);
            continue;
        };

        // Existence is checked before the action dispatch, so an unknown id
        // combined with an unsupported action still reads as a missing
        // article.
        match repo.find_by_id(id.clone()).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                report.fail(raw_id, MSG_NOT_FOUND);
                continue;
            }
            Err(_) => {
                report.fail(raw_id, MSG_FAILED);
                continue;
            }
        }

        let Some(op) = parsed else {
            report.fail(raw_id, format!("不支持的操作: {action}"));
            continue;
        };

        let outcome = match op {
            BulkAction::Delete => repo.delete(id).await,
            BulkAction::Publish => repo
                .update(id, ArticlePatch::publish(Utc::now()))
                .await
                .map(|_| ()),
            BulkAction::Unpublish | BulkAction::Draft => {
                repo.update(id, ArticlePatch::unpublish()).await.map(|_| ())
            }
            BulkAction::Archive => repo.update(id, ArticlePatch::archive()).await.map(|_| ()),
            BulkAction::UpdateTags => {
                let patch = ArticlePatch {
                    tags: payload.tags.clone(),
                    ..Default::default()
                };
                repo.update(id, patch).await.map(|_| ())
            }
            BulkAction::UpdateAccount => {
                let patch = ArticlePatch {
                    account_id: payload
                        .account_id
                        .as_deref()
                        .and_then(|raw| AccountId::try_new(raw).ok()),
                    ..Default::default()
                };
                repo.update(id, patch).await.map(|_| ())
            }
        };

        match outcome {
            Ok(()) => report.ok(),
            Err(RepositoryError::NotFound) => report.fail(raw_id, MSG_NOT_FOUND),
            Err(err) => {
                tracing::error!("bulk action on {raw_id} failed: {err:?}");
                report.fail(raw_id, MSG_FAILED);
            }
        }
    }

    tracing::info!(
        action,
        success = report.success,
        failed = report.failed,
        "bulk operation finished"
    );
    report
}
