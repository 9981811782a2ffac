use anyhow::{Context, Result};
use futures_util::future::join_all;

use super::store::TranscriptStore;
use crate::config::SearchConfig;
use crate::llm::embeddings::Embedder;
use crate::models::PhraseMatch;

/// Embed and search every phrase concurrently.
///
/// Returns one result list per phrase, in phrase order. A phrase whose
/// embedding or search fails contributes an empty list; the others are
/// unaffected. Resolves only once every phrase has finished.
pub async fn retrieve_all(
    embedder: &dyn Embedder,
    store: &dyn TranscriptStore,
    config: &SearchConfig,
    phrases: &[String],
) -> Vec<Vec<PhraseMatch>> {
    let searches = phrases.iter().map(|phrase| async move {
        match retrieve_phrase(embedder, store, config, phrase).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Retrieval failed for phrase '{phrase}': {e:#}");
                Vec::new()
            }
        }
    });

    join_all(searches).await
}

async fn retrieve_phrase(
    embedder: &dyn Embedder,
    store: &dyn TranscriptStore,
    config: &SearchConfig,
    phrase: &str,
) -> Result<Vec<PhraseMatch>> {
    let embedding = embedder
        .embed(phrase)
        .await
        .context("Embedding request failed")?;

    let chunks = store
        .match_chunks(&embedding, config.match_threshold, config.results_per_phrase)
        .await
        .context("Vector search failed")?;

    Ok(chunks
        .into_iter()
        .map(|chunk| PhraseMatch {
            chunk,
            matched_phrase: phrase.to_string(),
        })
        .collect())
}
