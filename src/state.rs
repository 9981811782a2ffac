use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::llm::chat::LlmClient;
use crate::llm::embeddings::{dimension_warning, EmbeddingClient, Embedder};
use crate::llm::ChatModel;
use crate::search::local::LocalStore;
use crate::search::store::TranscriptStore;
use crate::search::supabase::SupabaseStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: Arc<dyn ChatModel>,
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn TranscriptStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        if let Some(warning) = dimension_warning(&config.llm) {
            tracing::warn!("{warning}");
        }

        let chat = Arc::new(LlmClient::new(http_client.clone(), config.llm.clone()));
        let embedder = Arc::new(EmbeddingClient::new(http_client.clone(), config.llm.clone()));

        let store: Arc<dyn TranscriptStore> = match config.store.backend.as_str() {
            "supabase" => Arc::new(
                SupabaseStore::new(http_client, &config.store)
                    .context("Invalid Supabase store configuration")?,
            ),
            "local" => Arc::new(LocalStore::open_or_create(&config.local_store_dir())?),
            other => anyhow::bail!("Unknown store backend: {other}"),
        };

        Ok(Self::with_services(config, chat, embedder, store))
    }

    /// Assemble state from already-built collaborators.
    pub fn with_services(
        config: Config,
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            chat,
            embedder,
            store,
        }
    }
}
