use crate::domain::AppState;
use crate::infrastructure::import::FixtureSpreadsheetParser;
use crate::infrastructure::memory::InMemoryArticleRepository;

pub mod http;
pub mod import;
pub mod memory;
pub mod settings;

/// Production wiring: the in-memory store plus the fixture spreadsheet
/// parser.
#[derive(Clone)]
pub struct AppStateImpl {
    articles: InMemoryArticleRepository,
    spreadsheets: FixtureSpreadsheetParser,
}

impl AppStateImpl {
    pub fn new(articles: InMemoryArticleRepository, spreadsheets: FixtureSpreadsheetParser) -> Self {
        Self {
            articles,
            spreadsheets,
        }
    }
}

impl AppState for AppStateImpl {
    type R = InMemoryArticleRepository;
    type P = FixtureSpreadsheetParser;

    fn articles(&self) -> &Self::R {
        &self.articles
    }

    fn spreadsheets(&self) -> &Self::P {
        &self.spreadsheets
    }
}
