use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::store::TranscriptStore;
use crate::models::TranscriptChunk;

/// A stored transcript chunk with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: i64,
    pub episode_id: String,
    pub content: String,
    pub start_timestamp: f64,
    pub url: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    chunks: Vec<StoredChunk>,
    episodes: HashMap<String, String>,
}

/// In-memory transcript store with JSON persistence and cosine similarity search.
pub struct LocalStore {
    chunks: RwLock<Vec<StoredChunk>>,
    episodes: RwLock<HashMap<String, String>>,
    persist_path: PathBuf,
}

impl LocalStore {
    pub fn open_or_create(store_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(store_dir)?;
        let persist_path = store_dir.join("transcripts.json");

        let snapshot: Snapshot = if persist_path.exists() {
            let data = std::fs::read_to_string(&persist_path)
                .context("Failed to read transcript store")?;
            serde_json::from_str(&data).context("Failed to parse transcript store")?
        } else {
            Snapshot::default()
        };

        tracing::info!(
            "Local transcript store: {} chunks, {} episodes",
            snapshot.chunks.len(),
            snapshot.episodes.len()
        );

        Ok(Self {
            chunks: RwLock::new(snapshot.chunks),
            episodes: RwLock::new(snapshot.episodes),
            persist_path,
        })
    }

    /// Add (or replace, by id) transcript chunks and persist.
    pub fn add_chunks(&self, new_chunks: Vec<StoredChunk>) -> Result<()> {
        {
            let mut chunks = self.chunks.write();
            for chunk in new_chunks {
                chunks.retain(|c| c.id != chunk.id);
                chunks.push(chunk);
            }
        }
        self.persist()
    }

    /// Record an episode title and persist.
    pub fn set_episode_title(&self, episode_id: &str, title: &str) -> Result<()> {
        self.episodes
            .write()
            .insert(episode_id.to_string(), title.to_string());
        self.persist()
    }

    pub fn entry_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Cosine similarity search: every chunk scoring at least `threshold`,
    /// best first, truncated to `limit`.
    pub fn search(&self, query_embedding: &[f32], threshold: f32, limit: usize) -> Vec<TranscriptChunk> {
        let chunks = self.chunks.read();

        let mut scored: Vec<(f32, &StoredChunk)> = chunks
            .iter()
            .map(|c| (cosine_similarity(query_embedding, &c.embedding), c))
            .filter(|(score, _)| score.is_finite() && *score >= threshold)
            .collect();

        // Sort descending by score
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(similarity, c)| TranscriptChunk {
                id: c.id,
                episode_id: c.episode_id.clone(),
                content: c.content.clone(),
                start_timestamp: c.start_timestamp,
                url: c.url.clone(),
                similarity,
            })
            .collect()
    }

    fn persist(&self) -> Result<()> {
        let snapshot = Snapshot {
            chunks: self.chunks.read().clone(),
            episodes: self.episodes.read().clone(),
        };
        let data = serde_json::to_string(&snapshot)?;
        let tmp_path = self.persist_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &self.persist_path)?;
        Ok(())
    }
}

#[async_trait]
impl TranscriptStore for LocalStore {
    async fn match_chunks(
        &self,
        embedding: &[f32],
        threshold: f32,
        count: usize,
    ) -> Result<Vec<TranscriptChunk>> {
        Ok(self.search(embedding, threshold, count))
    }

    async fn lookup_titles(&self, episode_ids: &[String]) -> Result<HashMap<String, String>> {
        let episodes = self.episodes.read();
        Ok(episode_ids
            .iter()
            .filter_map(|id| episodes.get(id).map(|title| (id.clone(), title.clone())))
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: i64, embedding: Vec<f32>) -> StoredChunk {
        StoredChunk {
            id,
            episode_id: format!("ep-{id}"),
            content: format!("chunk {id}"),
            start_timestamp: id as f64 * 10.0,
            url: format!("https://youtu.be/{id}"),
            embedding,
        }
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_search_applies_threshold_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open_or_create(dir.path()).unwrap();
        store
            .add_chunks(vec![
                chunk(1, vec![1.0, 0.0]),
                chunk(2, vec![0.9, 0.1]),
                chunk(3, vec![0.0, 1.0]),
            ])
            .unwrap();

        let results = store.search(&[1.0, 0.0], 0.3, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 1);
        assert_eq!(results[1].id, 2);

        let results = store.search(&[1.0, 0.0], 0.3, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_search_skips_non_finite_embeddings() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open_or_create(dir.path()).unwrap();
        store
            .add_chunks(vec![
                chunk(1, vec![f32::NAN, 0.0]),
                chunk(2, vec![0.8, 0.2]),
                chunk(3, vec![f32::INFINITY, 1.0]),
                chunk(4, vec![1.0, 0.0]),
            ])
            .unwrap();

        let ids: Vec<i64> = store.search(&[1.0, 0.0], 0.0, 10).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 2]);
    }

    #[test]
    fn test_add_chunks_replaces_same_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open_or_create(dir.path()).unwrap();
        store.add_chunks(vec![chunk(7, vec![1.0, 0.0])]).unwrap();
        store.add_chunks(vec![chunk(7, vec![0.0, 1.0])]).unwrap();
        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.search(&[0.0, 1.0], 0.9, 10)[0].id, 7);
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LocalStore::open_or_create(dir.path()).unwrap();
            store.add_chunks(vec![chunk(1, vec![1.0, 0.0])]).unwrap();
            store.set_episode_title("ep-1", "The Airbnb Episode").unwrap();
        }
        let reopened = LocalStore::open_or_create(dir.path()).unwrap();
        assert_eq!(reopened.entry_count(), 1);
        assert_eq!(reopened.episodes.read().get("ep-1").unwrap(), "The Airbnb Episode");
    }

    #[tokio::test]
    async fn test_lookup_titles_skips_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open_or_create(dir.path()).unwrap();
        store.set_episode_title("a", "Episode A").unwrap();

        let titles = store
            .lookup_titles(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(titles.len(), 1);
        assert_eq!(titles["a"], "Episode A");
    }
}
