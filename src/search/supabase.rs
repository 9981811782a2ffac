//! Supabase (PostgREST) transcript store.
//!
//! Similarity search goes through a SQL function exposed as an RPC
//! (`match_transcripts(query_embedding, match_threshold, match_count)`),
//! episode titles are read straight from the episodes table.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::store::TranscriptStore;
use crate::config::StoreConfig;
use crate::models::TranscriptChunk;

pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    match_function: String,
    episodes_table: String,
}

impl SupabaseStore {
    pub fn new(client: reqwest::Client, config: &StoreConfig) -> Result<Self> {
        let base_url = config
            .supabase_url
            .as_deref()
            .context("SUPABASE_URL is not configured")?;
        let api_key = config
            .supabase_key
            .as_deref()
            .context("SUPABASE_KEY is not configured")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            match_function: config.match_function.clone(),
            episodes_table: config.episodes_table.clone(),
        })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

#[derive(Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_threshold: f32,
    match_count: usize,
}

#[derive(Deserialize)]
struct EpisodeRow {
    id: String,
    #[serde(default)]
    title: Option<String>,
}

#[async_trait]
impl TranscriptStore for SupabaseStore {
    async fn match_chunks(
        &self,
        embedding: &[f32],
        threshold: f32,
        count: usize,
    ) -> Result<Vec<TranscriptChunk>> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, self.match_function);

        let req = MatchRequest {
            query_embedding: embedding,
            match_threshold: threshold,
            match_count: count,
        };

        let resp = self
            .authorized(self.client.post(&url))
            .json(&req)
            .send()
            .await
            .context("Failed to call Supabase match RPC")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Supabase match RPC returned {status}: {body}");
        }

        // A null body means no rows.
        let rows: Option<Vec<TranscriptChunk>> = resp
            .json()
            .await
            .context("Failed to parse Supabase match response")?;
        Ok(rows.unwrap_or_default())
    }

    async fn lookup_titles(&self, episode_ids: &[String]) -> Result<HashMap<String, String>> {
        if episode_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/rest/v1/{}", self.base_url, self.episodes_table);

        let resp = self
            .authorized(self.client.get(&url))
            .query(&[("select", "id,title".to_string()), ("id", in_filter(episode_ids))])
            .send()
            .await
            .context("Failed to query Supabase episodes")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Supabase episodes query returned {status}: {body}");
        }

        let rows: Vec<EpisodeRow> = resp
            .json()
            .await
            .context("Failed to parse Supabase episodes response")?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.title.map(|title| (row.id, title)))
            .collect())
    }
}

/// PostgREST `in.(...)` filter with every value double-quoted.
fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_filter_quotes_values() {
        let ids = vec!["abc".to_string(), "d,e".to_string()];
        assert_eq!(in_filter(&ids), r#"in.("abc","d,e")"#);
    }

    #[test]
    fn test_in_filter_escapes_quotes() {
        let ids = vec![r#"a"b"#.to_string()];
        assert_eq!(in_filter(&ids), r#"in.("a\"b")"#);
    }

    #[test]
    fn test_new_requires_credentials() {
        let config = StoreConfig::default();
        assert!(SupabaseStore::new(reqwest::Client::new(), &config).is_err());

        let config = StoreConfig {
            supabase_url: Some("https://example.supabase.co/".to_string()),
            supabase_key: Some("key".to_string()),
            ..StoreConfig::default()
        };
        let store = SupabaseStore::new(reqwest::Client::new(), &config).unwrap();
        assert_eq!(store.base_url, "https://example.supabase.co");
    }

    #[test]
    fn test_match_row_deserializes() {
        let rows: Vec<TranscriptChunk> = serde_json::from_str(
            r#"[{"id": 42, "episode_id": "ep", "content": "holy cow", "start_timestamp": 12.5,
                 "url": "https://youtu.be/x", "similarity": 0.61}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].id, 42);
        assert!((rows[0].similarity - 0.61).abs() < 1e-6);
    }

    #[test]
    fn test_match_request_shape() {
        let embedding = [0.1f32, 0.2];
        let req = MatchRequest {
            query_embedding: &embedding,
            match_threshold: 0.3,
            match_count: 10,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["match_count"], 10);
        assert_eq!(json["query_embedding"].as_array().unwrap().len(), 2);
    }
}
