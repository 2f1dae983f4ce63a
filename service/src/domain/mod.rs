use crate::domain::import::SpreadsheetParser;
use crate::domain::repository::ArticleRepository;

pub mod bulk;
pub mod import;
pub mod repository;
pub mod stats;

/// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type R: ArticleRepository;
    type P: SpreadsheetParser;

    fn articles(&self) -> &Self::R;
    fn spreadsheets(&self) -> &Self::P;
}
