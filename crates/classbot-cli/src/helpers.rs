//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization and store construction from config.

use anyhow::{Context, Result};
use classbot_store::{AccountStore, CorpusStore, QaService, SessionGate};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
pub fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

pub async fn open_corpus(config: &AppConfig) -> Result<CorpusStore> {
    let path = &config.storage.questions_file;
    CorpusStore::open(path)
        .await
        .with_context(|| format!("failed to load questions from {}", path.display()))
}

pub async fn open_accounts(config: &AppConfig) -> Result<AccountStore> {
    let path = &config.storage.users_file;
    let store = AccountStore::open(path)
        .await
        .with_context(|| format!("failed to load accounts from {}", path.display()))?;
    Ok(store.with_iterations(config.auth.pbkdf2_iterations))
}

/// Load both stores and wire them into a [`QaService`].
pub async fn build_service(config: &AppConfig) -> Result<QaService> {
    let corpus = open_corpus(config).await?;
    let accounts = open_accounts(config).await?;
    let sessions = SessionGate::new(config.session.ttl(), config.session.max_sessions);
    Ok(QaService::new(corpus, accounts, sessions))
}
