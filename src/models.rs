use serde::{Deserialize, Serialize};

/// A transcript chunk as returned by the vector store for one phrase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptChunk {
    pub id: i64,
    pub episode_id: String,
    pub content: String,
    /// Seconds from the start of the episode
    pub start_timestamp: f64,
    pub url: String,
    /// Similarity to the probing phrase, in [0, 1]
    pub similarity: f32,
}

/// A chunk tagged with the phrase whose embedding surfaced it.
#[derive(Debug, Clone)]
pub struct PhraseMatch {
    pub chunk: TranscriptChunk,
    pub matched_phrase: String,
}

/// A final ranked row in the search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub id: i64,
    pub episode_id: String,
    pub content: String,
    pub start_timestamp: f64,
    pub url: String,
    /// Boosted score, not the raw vector similarity
    pub similarity: f32,
    /// Number of phrases that matched this chunk
    pub match_count: usize,
    /// First phrase that matched this chunk
    pub matched_phrase: String,
    pub episode_title: String,
    pub match_level: String,
    /// `start_timestamp` rendered as `M:SS` or `H:MM:SS`
    pub timestamp: String,
}

/// Search request. `query` stays untyped so a non-string value is a
/// validation error rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<serde_json::Value>,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub generated_phrases: Vec<String>,
    pub results: Vec<ScoredResult>,
    /// Distinct chunks matched before truncation
    pub total_found: usize,
}

/// Caption request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Caption response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionResponse {
    pub caption: String,
}

/// Human-readable strength label for a (boosted) similarity score.
pub fn match_level(similarity: f32) -> &'static str {
    if similarity >= 0.7 {
        "Excellent Match"
    } else if similarity >= 0.5 {
        "Strong Match"
    } else if similarity >= 0.35 {
        "Good Match"
    } else {
        "Partial Match"
    }
}

/// Format seconds as `M:SS`, or `H:MM:SS` from one hour up.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
