use wemp_common::seed::sample_articles;

use crate::infrastructure::AppStateImpl;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::import::FixtureSpreadsheetParser;
use crate::infrastructure::memory::InMemoryArticleRepository;
use crate::infrastructure::settings::Settings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod domain;
mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("Configuration loaded");

    let articles = if settings.seed_sample_data {
        InMemoryArticleRepository::seeded(sample_articles())
    } else {
        InMemoryArticleRepository::empty()
    };
    tracing::info!("article store ready");

    let state = AppStateImpl::new(articles, FixtureSpreadsheetParser::default());

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
