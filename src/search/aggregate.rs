use std::collections::HashMap;

use super::store::TranscriptStore;
use crate::config::SearchConfig;
use crate::models::{format_timestamp, match_level, PhraseMatch, ScoredResult, TranscriptChunk};

const UNKNOWN_EPISODE: &str = "Unknown Episode";

/// All matches for one transcript chunk across the phrase set.
///
/// `count` and `total_similarity` are the running state; the average is
/// derived from them on demand.
#[derive(Debug, Clone)]
pub struct AggregatedMatch {
    /// Snapshot of the highest-similarity occurrence
    pub chunk: TranscriptChunk,
    pub count: usize,
    pub max_similarity: f32,
    pub total_similarity: f32,
    /// Phrases that matched, in fold order
    pub phrases: Vec<String>,
}

impl AggregatedMatch {
    fn new(m: PhraseMatch) -> Self {
        Self {
            count: 1,
            max_similarity: m.chunk.similarity,
            total_similarity: m.chunk.similarity,
            phrases: vec![m.matched_phrase],
            chunk: m.chunk,
        }
    }

    /// Fold one more occurrence of the same chunk id.
    fn absorb(&mut self, m: PhraseMatch) {
        self.count += 1;
        self.total_similarity += m.chunk.similarity;
        self.phrases.push(m.matched_phrase);

        // Strictly greater: ties keep the earlier snapshot.
        if m.chunk.similarity > self.max_similarity {
            self.max_similarity = m.chunk.similarity;
            self.chunk = m.chunk;
        }
    }

    pub fn avg_similarity(&self) -> f32 {
        self.total_similarity / self.count as f32
    }

    /// Best similarity, boosted per corroborating phrase.
    pub fn score(&self, config: &SearchConfig) -> f32 {
        boosted_score(
            self.max_similarity,
            self.count,
            config.boost_increment,
            config.boost_cap,
        )
    }
}

/// `max_similarity * (1 + min((count - 1) * increment, cap))`
pub fn boosted_score(max_similarity: f32, count: usize, increment: f32, cap: f32) -> f32 {
    let extra = count.saturating_sub(1) as f32;
    let boost = (extra * increment).min(cap);
    max_similarity * (1.0 + boost)
}

/// Outros, sign-offs and other housekeeping that match many queries but say nothing.
pub fn is_podcast_meta(content: &str, ignored: &[String]) -> bool {
    let lower = content.to_lowercase();
    ignored
        .iter()
        .any(|phrase| lower.contains(&phrase.to_lowercase()))
}

/// Merge per-phrase results by chunk id, dropping housekeeping chunks and
/// chunks without a finite similarity. Output is in first-seen order.
pub fn fold_matches(
    phrase_results: Vec<Vec<PhraseMatch>>,
    ignored: &[String],
) -> Vec<AggregatedMatch> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut matches: Vec<AggregatedMatch> = Vec::new();

    for m in phrase_results.into_iter().flatten() {
        if !m.chunk.similarity.is_finite() {
            tracing::warn!(
                "Dropping chunk {} with non-finite similarity {}",
                m.chunk.id,
                m.chunk.similarity
            );
            continue;
        }
        if is_podcast_meta(&m.chunk.content, ignored) {
            continue;
        }

        match index.get(&m.chunk.id) {
            Some(&i) => matches[i].absorb(m),
            None => {
                index.insert(m.chunk.id, matches.len());
                matches.push(AggregatedMatch::new(m));
            }
        }
    }

    matches
}

/// Score and sort descending. The sort is stable, so ties keep first-seen order.
pub fn rank(matches: Vec<AggregatedMatch>, config: &SearchConfig) -> Vec<(AggregatedMatch, f32)> {
    let mut scored: Vec<(AggregatedMatch, f32)> = matches
        .into_iter()
        .map(|m| {
            let score = m.score(config);
            (m, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

/// Final ranking for a request.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Top `max_results` rows with episode titles
    pub results: Vec<ScoredResult>,
    /// Distinct chunks matched before truncation
    pub total_found: usize,
}

/// Fold, score, sort, truncate and attach episode titles.
///
/// A failed title lookup is not an error: every row gets the placeholder title.
pub async fn aggregate(
    store: &dyn TranscriptStore,
    config: &SearchConfig,
    phrase_results: Vec<Vec<PhraseMatch>>,
) -> Aggregation {
    let mut ranked = rank(fold_matches(phrase_results, &config.ignored_podcast_meta), config);
    let total_found = ranked.len();
    ranked.truncate(config.max_results);

    let episode_ids = distinct_episode_ids(&ranked);
    let titles = match store.lookup_titles(&episode_ids).await {
        Ok(titles) => titles,
        Err(e) => {
            tracing::warn!("Episode title lookup failed: {e:#}");
            HashMap::new()
        }
    };

    Aggregation {
        results: into_scored_results(ranked, &titles),
        total_found,
    }
}

fn distinct_episode_ids(ranked: &[(AggregatedMatch, f32)]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for (m, _) in ranked {
        if !ids.contains(&m.chunk.episode_id) {
            ids.push(m.chunk.episode_id.clone());
        }
    }
    ids
}

fn into_scored_results(
    ranked: Vec<(AggregatedMatch, f32)>,
    titles: &HashMap<String, String>,
) -> Vec<ScoredResult> {
    ranked
        .into_iter()
        .map(|(m, score)| {
            let episode_title = titles
                .get(&m.chunk.episode_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_EPISODE.to_string());
            let matched_phrase = m.phrases.first().cloned().unwrap_or_default();

            ScoredResult {
                id: m.chunk.id,
                timestamp: format_timestamp(m.chunk.start_timestamp),
                episode_id: m.chunk.episode_id,
                content: m.chunk.content,
                start_timestamp: m.chunk.start_timestamp,
                url: m.chunk.url,
                similarity: score,
                match_count: m.count,
                matched_phrase,
                episode_title,
                match_level: match_level(score).to_string(),
            }
        })
        .collect()
}
