use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the local transcript store is persisted
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration (chat + embeddings)
    pub llm: LlmConfig,
    /// Transcript vector store configuration
    pub store: StoreConfig,
    /// Tuning knobs for expansion, retrieval and ranking
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "ollama"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for classification, expansion and captions
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Embedding vector dimension, must match the transcript index
    pub embedding_dim: usize,
}

/// Where transcript chunks and episode metadata live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "supabase" or "local"
    pub backend: String,
    /// Supabase project URL (e.g. "https://xyz.supabase.co")
    pub supabase_url: Option<String>,
    /// Supabase service or anon key
    pub supabase_key: Option<String>,
    /// Name of the similarity RPC
    pub match_function: String,
    /// Table holding `id, title` rows for episodes
    pub episodes_table: String,
}

/// Named tuning parameters for the search pipeline.
///
/// These are empirically chosen values, not correctness constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum phrases kept after sanitizing the expansion output
    pub max_phrases: usize,
    /// Vector-store result cap per phrase
    pub results_per_phrase: usize,
    /// Minimum similarity returned by the vector store
    pub match_threshold: f32,
    /// Maximum ranked results in a response
    pub max_results: usize,
    /// Score bonus per additional corroborating phrase
    pub boost_increment: f32,
    /// Upper bound on the total corroboration bonus
    pub boost_cap: f32,
    /// Longest phrase (in chars) the sanitizer keeps
    pub max_phrase_chars: usize,
    pub classifier_temperature: f32,
    pub classifier_max_tokens: u32,
    pub expansion_temperature: f32,
    pub expansion_max_tokens: u32,
    /// Lowercase substrings that disqualify a generated phrase
    pub banned_terms: Vec<String>,
    /// Lowercase housekeeping phrases that disqualify a transcript chunk
    pub ignored_podcast_meta: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9000".to_string(),
            llm: LlmConfig::default(),
            store: StoreConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            api_key: None,
            embedding_dim: 512,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "supabase".to_string(),
            supabase_url: None,
            supabase_key: None,
            match_function: "match_transcripts".to_string(),
            episodes_table: "episodes".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_phrases: 15,
            results_per_phrase: 10,
            match_threshold: 0.3,
            max_results: 15,
            boost_increment: 0.05,
            boost_cap: 0.5,
            max_phrase_chars: 150,
            classifier_temperature: 0.0,
            classifier_max_tokens: 10,
            expansion_temperature: 0.7,
            expansion_max_tokens: 200,
            banned_terms: ["repurpose", "short form", "clip"]
                .into_iter()
                .map(String::from)
                .collect(),
            ignored_podcast_meta: [
                "end of the episode",
                "end of this episode",
                "end of the show",
                "thanks for listening",
                "subscribe to the channel",
                "like and subscribe",
                "see you next week",
                "tune in next time",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Parse `name` into `target`, keeping the current value when unset or malformed.
fn override_parsed<T: std::str::FromStr>(name: &str, target: &mut T) {
    if let Ok(val) = std::env::var(name) {
        if let Ok(v) = val.parse() {
            *target = v;
        }
    }
}

/// Comma-separated list, lowercased, blanks dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("PODCAST_SEARCH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("PODCAST_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // LLM config
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY").or_else(|_| std::env::var("OPENAI_API_KEY")) {
            config.llm.api_key = Some(key);
        }
        override_parsed("LLM_EMBEDDING_DIM", &mut config.llm.embedding_dim);

        // Store config
        if let Ok(backend) = std::env::var("STORE_BACKEND") {
            config.store.backend = backend;
        }
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            config.store.supabase_url = Some(url);
        }
        if let Ok(key) = std::env::var("SUPABASE_KEY") {
            config.store.supabase_key = Some(key);
        }
        if let Ok(name) = std::env::var("SUPABASE_MATCH_FUNCTION") {
            config.store.match_function = name;
        }
        if let Ok(table) = std::env::var("SUPABASE_EPISODES_TABLE") {
            config.store.episodes_table = table;
        }

        // Search tuning
        let search = &mut config.search;
        override_parsed("SEARCH_MAX_PHRASES", &mut search.max_phrases);
        override_parsed("SEARCH_RESULTS_PER_PHRASE", &mut search.results_per_phrase);
        override_parsed("SEARCH_MATCH_THRESHOLD", &mut search.match_threshold);
        override_parsed("SEARCH_MAX_RESULTS", &mut search.max_results);
        override_parsed("SEARCH_BOOST_INCREMENT", &mut search.boost_increment);
        override_parsed("SEARCH_BOOST_CAP", &mut search.boost_cap);
        override_parsed("SEARCH_MAX_PHRASE_CHARS", &mut search.max_phrase_chars);
        override_parsed("SEARCH_EXPANSION_TEMPERATURE", &mut search.expansion_temperature);
        if let Ok(val) = std::env::var("SEARCH_BANNED_TERMS") {
            search.banned_terms = parse_list(&val);
        }
        if let Ok(val) = std::env::var("SEARCH_IGNORED_META") {
            search.ignored_podcast_meta = parse_list(&val);
        }

        config
    }

    pub fn local_store_dir(&self) -> PathBuf {
        self.data_dir.join("transcripts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let config = Config::default();
        assert_eq!(config.llm.embedding_dim, 512);
        assert_eq!(config.llm.embedding_model, "text-embedding-3-small");
        assert_eq!(config.search.max_phrases, 15);
        assert_eq!(config.search.results_per_phrase, 10);
        assert!((config.search.match_threshold - 0.3).abs() < 1e-6);
        assert_eq!(config.search.max_results, 15);
        assert!((config.search.boost_increment - 0.05).abs() < 1e-6);
        assert!((config.search.boost_cap - 0.5).abs() < 1e-6);
        assert_eq!(config.search.max_phrase_chars, 150);
    }

    #[test]
    fn test_default_filter_lists() {
        let search = SearchConfig::default();
        assert!(search.banned_terms.contains(&"repurpose".to_string()));
        assert!(search.banned_terms.contains(&"short form".to_string()));
        assert_eq!(search.ignored_podcast_meta.len(), 8);
        assert!(search
            .ignored_podcast_meta
            .contains(&"thanks for listening".to_string()));
    }

    #[test]
    fn test_parse_list_trims_and_lowercases() {
        let list = parse_list(" Repurpose, SHORT form ,, clip ");
        assert_eq!(list, vec!["repurpose", "short form", "clip"]);
    }
}
