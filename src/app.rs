//! Orchestrator assembly
//!
//! Resolves the generator and the session storage from configuration and
//! wires them into an [`Orchestrator`].

use crate::settings::{AppConfig, StorageBackend, StorageConfig};
use solace_core::{
    Error, Journal, LlmGenerator, MemoryJournal, MemoryStore, Orchestrator, RedisStore,
    SessionStore, SqliteJournal, SqliteStore, TemplateGenerator, TextGenerator,
};
use solace_llm::{OpenAiConfig, OpenAiProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build the orchestrator for one CLI run
pub async fn build_orchestrator(
    config: &AppConfig,
    offline: bool,
) -> solace_core::Result<Orchestrator> {
    let generator = resolve_generator(config, offline)?;
    let (store, journal) = init_storage(&config.storage).await?;

    let mut orchestrator = Orchestrator::new(generator, store, config.orchestrator_config());
    if let Some(journal) = journal {
        orchestrator = orchestrator.with_journal(journal);
    }
    info!(
        generator = orchestrator.generator_name(),
        backend = ?config.storage.backend,
        "Orchestrator ready"
    );
    Ok(orchestrator)
}

/// Offline runs answer from templates; otherwise an OpenAI key is required
pub fn resolve_generator(
    config: &AppConfig,
    offline: bool,
) -> solace_core::Result<Arc<dyn TextGenerator>> {
    if offline {
        info!("Offline mode: answering from response templates");
        return Ok(Arc::new(TemplateGenerator::new()));
    }

    let llm = &config.llm;
    // a missing key surfaces as a fatal configuration error
    let mut provider_config = OpenAiConfig::from_env()
        .map_err(Error::Llm)?
        .with_timeout(Duration::from_secs(llm.timeout_secs));
    if !llm.model.is_empty() {
        provider_config = provider_config.with_model(llm.model.clone());
    }
    info!(model = %provider_config.default_model, "Registered OpenAI provider");

    let generator = LlmGenerator::new(Arc::new(OpenAiProvider::new(provider_config)))
        .with_max_tokens(llm.max_tokens)
        .with_temperature(llm.temperature);
    Ok(Arc::new(generator))
}

/// Session store and journal for the configured backend
pub async fn init_storage(
    storage: &StorageConfig,
) -> solace_core::Result<(Arc<dyn SessionStore>, Option<Arc<dyn Journal>>)> {
    match storage.backend {
        StorageBackend::Memory => {
            let store = MemoryStore::try_new()?;
            let journal: Option<Arc<dyn Journal>> = storage
                .journal
                .then(|| Arc::new(MemoryJournal::new()) as Arc<dyn Journal>);
            Ok((Arc::new(store), journal))
        }
        StorageBackend::Sqlite => {
            let path = storage.sqlite_path();
            let store = SqliteStore::new(&path).await?;
            info!("SQLite session store initialized at {}", path.display());
            let journal = if storage.journal {
                let journal = SqliteJournal::from_pool(store.pool().clone()).await?;
                Some(Arc::new(journal) as Arc<dyn Journal>)
            } else {
                None
            };
            Ok((Arc::new(store), journal))
        }
        StorageBackend::Redis => {
            let store = RedisStore::new(&storage.redis_url, storage.session_ttl_secs)?;
            info!(url = %storage.redis_url, ttl_secs = storage.session_ttl_secs, "Redis session store initialized");
            Ok((Arc::new(store), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_uses_templates() {
        let generator = resolve_generator(&AppConfig::default(), true).unwrap();
        assert_eq!(generator.name(), "template");
    }

    #[tokio::test]
    async fn test_sqlite_storage_with_journal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            backend: StorageBackend::Sqlite,
            sqlite_path: dir.path().join("sessions.db").display().to_string(),
            ..StorageConfig::default()
        };
        let (store, journal) = init_storage(&storage).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(journal.is_some());
    }
}
