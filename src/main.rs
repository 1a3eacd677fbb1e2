mod bot;
mod config;
mod corpus;
mod platform;
mod webhook;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::AppState;
use crate::config::Config;
use crate::corpus::Corpus;
use crate::platform::telegram::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,topicbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let webhook_path = config.webhook_path()?;

    if config.telegram.bot_token.is_empty() {
        warn!("BOTTOKEN is not set, replies will fail to send");
    }

    // Corpora are read once; a missing file leaves an empty table
    let topics = Corpus::load(&config.corpus.topics_path);
    let rules = Corpus::load(&config.corpus.rules_path);

    let sender = Arc::new(TelegramClient::new(&config.telegram));
    let state = Arc::new(AppState::new(&config, topics, &rules, sender));

    info!("Configuration loaded successfully");
    info!("  Topics: {}", state.topic_count());
    info!("  Rules: {} lines", rules.len());
    info!("  Webhook path: {}", webhook_path);

    webhook::serve(state, &config.listen_addr(), &webhook_path).await
}
