use crate::domain::import::{ImportedRow, SpreadsheetFile, SpreadsheetParser};

/// Stand-in for a real spreadsheet parser. Produces a deterministic set of
/// rows derived from the file name, so the import pipeline can be exercised
/// end to end without a binary Excel reader.
#[derive(Debug, Clone, Default)]
pub struct FixtureSpreadsheetParser;

impl SpreadsheetParser for FixtureSpreadsheetParser {
    async fn parse(&self, file: &SpreadsheetFile) -> anyhow::Result<Vec<ImportedRow>> {
        tracing::debug!(
            file = %file.name,
            size = file.bytes.len(),
            "parsing spreadsheet with fixture rows"
        );

        let stem = stem(&file.name);
        Ok((1..=3)
            .map(|n| ImportedRow {
                title: format!("{stem} 导入文章 {n}"),
                content: format!("来自 {} 的第 {n} 行正文。", file.name),
                author: "导入用户".to_string(),
                status: None,
                tags: vec!["批量导入".to_string()],
            })
            .collect())
    }
}

fn stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}
