use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use crate::models::TranscriptChunk;

/// Nearest-neighbour transcript index plus the episode metadata it references.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Chunks with similarity >= `threshold`, best first, at most `count`.
    async fn match_chunks(
        &self,
        embedding: &[f32],
        threshold: f32,
        count: usize,
    ) -> Result<Vec<TranscriptChunk>>;

    /// Titles for the given episode ids. Unknown ids are simply absent.
    async fn lookup_titles(&self, episode_ids: &[String]) -> Result<HashMap<String, String>>;
}
