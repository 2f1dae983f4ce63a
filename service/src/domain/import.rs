use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use wemp_common::{AccountId, ArticleDraft, ArticleId, ArticlePatch, ArticleStatus, DEFAULT_ACCOUNT_ID};

use crate::domain::repository::{ArticleRepository, RepositoryError};

/// Hard cap on uploaded spreadsheets.
pub const MAX_SPREADSHEET_BYTES: usize = 10 * 1024 * 1024;

const SPREADSHEET_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/csv",
];

const SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv"];

/// An uploaded file, as received by the import endpoint.
#[derive(Debug, Clone)]
pub struct SpreadsheetFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetRejection {
    UnsupportedFormat,
    TooLarge,
}

impl SpreadsheetFile {
    /// MIME allow-list first, extension fallback, then the size cap.
    pub fn validate(&self) -> Result<(), SpreadsheetRejection> {
        let mime_ok = self
            .content_type
            .as_deref()
            .is_some_and(|ct| SPREADSHEET_MIME_TYPES.contains(&ct));
        let name = self.name.to_ascii_lowercase();
        let extension_ok = SPREADSHEET_EXTENSIONS.iter().any(|ext| name.ends_with(ext));
        if !mime_ok && !extension_ok {
            return Err(SpreadsheetRejection::UnsupportedFormat);
        }
        if self.bytes.len() > MAX_SPREADSHEET_BYTES {
            return Err(SpreadsheetRejection::TooLarge);
        }
        Ok(())
    }
}

/// One row as produced by a parser adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedRow {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// External collaborator port: turns an uploaded spreadsheet into rows. The
/// demo wires a fixture adapter; a real deployment plugs an Excel/CSV
/// parser in behind the same contract.
pub trait SpreadsheetParser: Send + Sync + 'static {
    fn parse(
        &self,
        file: &SpreadsheetFile,
    ) -> impl Future<Output = anyhow::Result<Vec<ImportedRow>>> + Send;
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportOptions {
    pub account_id: String,
    pub skip_duplicates: bool,
    pub update_existing: bool,
    pub status: ArticleStatus,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            skip_duplicates: true,
            update_existing: false,
            status: ArticleStatus::Draft,
        }
    }
}

/// Row numbers follow spreadsheet convention: data starts at row 2, below
/// the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowError {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}

/// Store parsed rows through the repository. A row's failure is recorded
/// with its spreadsheet row number and never aborts the run; duplicate
/// titles are skipped or updated in place depending on `options`.
pub async fn run_import<R: ArticleRepository>(
    repo: &R,
    rows: Vec<ImportedRow>,
    options: &ImportOptions,
) -> Result<ImportReport, RepositoryError> {
    let mut report = ImportReport {
        total: rows.len(),
        ..Default::default()
    };

    let account_id = AccountId::try_new(options.account_id.as_str())
        .map_err(|err| RepositoryError::ValidationFailed(err.to_string()))?;

    let mut known_titles: HashMap<String, ArticleId> = repo
        .list_all()
        .await?
        .into_iter()
        .map(|article| (article.title, article.id))
        .collect();

    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + 2;

        if row.title.trim().is_empty() {
            report.errors.push(ImportRowError {
                row: row_number,
                message: "导入失败: 标题不能为空".to_string(),
            });
            report.skipped += 1;
            continue;
        }

        match known_titles.get(&row.title) {
            Some(id) if options.update_existing => {
                let patch = ArticlePatch {
                    content: Some(row.content),
                    author: Some(row.author),
                    status: Some(row.status.unwrap_or(options.status)),
                    tags: Some(row.tags),
                    account_id: Some(account_id.clone()),
                    ..Default::default()
                };
                match repo.update(id.clone(), patch).await {
                    Ok(_) => report.imported += 1,
                    Err(err) => {
                        tracing::error!("import row {row_number} update failed: {err:?}");
                        report.errors.push(ImportRowError {
                            row: row_number,
                            message: "导入失败: 更新已有文章失败".to_string(),
                        });
                        report.skipped += 1;
                    }
                }
            }
            Some(_) if options.skip_duplicates => report.skipped += 1,
            _ => {
                let draft = ArticleDraft {
                    title: row.title.clone(),
                    content: row.content,
                    author: row.author,
                    status: Some(row.status.unwrap_or(options.status)),
                    publish_time: None,
                    tags: row.tags,
                    account_id: Some(account_id.clone()),
                };
                match repo.insert(draft).await {
                    Ok(article) => {
                        known_titles.insert(article.title.clone(), article.id.clone());
                        report.imported += 1;
                    }
                    Err(err) => {
                        tracing::error!("import row {row_number} insert failed: {err:?}");
                        report.errors.push(ImportRowError {
                            row: row_number,
                            message: "导入失败: 写入文章失败".to_string(),
                        });
                        report.skipped += 1;
                    }
                }
            }
        }
    }

    Ok(report)
}
