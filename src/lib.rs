//! # podcast-search
//!
//! A Rust web service for semantic search over podcast transcripts. A
//! natural-language query is classified by intent, expanded into many
//! targeted search phrases, searched in parallel against a vector index,
//! and merged into a single ranking that rewards corroboration.
//!
//! ## Architecture
//!
//! ```text
//!                        ┌──────────────┐
//!                        │  User Query  │
//!                        └──────┬───────┘
//!                               ▼
//!                    ┌─────────────────────┐
//!                    │  Intent Classifier  │
//!                    │  (LLM → 5 buckets)  │
//!                    └──────────┬──────────┘
//!                               ▼
//!                    ┌─────────────────────┐
//!                    │  Strategy Template  │
//!                    │  (enum → prompt)    │
//!                    └──────────┬──────────┘
//!                               ▼
//!                    ┌─────────────────────┐
//!                    │  Phrase Generator   │
//!                    │  + Sanitizer (≤15)  │
//!                    └──────────┬──────────┘
//!                               │ N phrases
//!            ┌──────────────────┼──────────────────┐
//!            ▼                  ▼                  ▼
//!     ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!     │  Phrase 1   │    │  Phrase 2   │    │  Phrase N   │
//!     │ embed+match │    │ embed+match │    │ embed+match │
//!     └──────┬──────┘    └──────┬──────┘    └──────┬──────┘
//!            └──────────────────┼──────────────────┘
//!                               │ join (failures → empty)
//!                               ▼
//!                  ┌─────────────────────────┐
//!                  │  Aggregate by chunk id  │
//!                  │  drop podcast meta-talk │
//!                  │  max × (1 + 5%/extra)   │
//!                  │  cap +50%, keep top 15  │
//!                  └────────────┬────────────┘
//!                               ▼
//!                  ┌─────────────────────────┐
//!                  │  Episode title lookup   │
//!                  └─────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration and search tuning knobs
//! - [`models`] - Transcript chunks, ranked results, request/response types
//! - [`llm::intent`] - Query intent classification
//! - [`llm::strategy`] - Intent → expansion prompt templates
//! - [`llm::query_expand`] - Phrase generation and sanitizing
//! - [`llm::embeddings`] - Phrase embeddings via OpenAI or Ollama
//! - [`llm::caption`] - Social caption generation for clips
//! - [`search::retriever`] - Concurrent per-phrase retrieval
//! - [`search::aggregate`] - Merge, boost, rank and enrich
//! - [`search::supabase`] / [`search::local`] - Transcript store backends
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state holding the collaborators

pub mod api;
pub mod config;
pub mod llm;
pub mod models;
pub mod search;
pub mod state;
