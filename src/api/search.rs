use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::error::ApiError;
use crate::llm::intent::classify;
use crate::llm::query_expand::{expand_query, sanitize_phrases};
use crate::llm::strategy::select_prompt;
use crate::models::{SearchRequest, SearchResponse};
use crate::search::aggregate::aggregate;
use crate::search::retriever::retrieve_all;
use crate::search::SearchStage;
use crate::state::AppState;

/// POST /api/search - Intent-aware multi-query search:
///   1. Classify the query intent (LLM)
///   2. Expand into 3-15 phrases with the intent's template (LLM) and sanitize
///   3. Embed + vector search every phrase concurrently
///   4. Merge by chunk, boost corroborated chunks, attach episode titles
pub async fn search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = validate_query(body)?;
    let response = run_search(&state, &query).await?;
    Ok(Json(response))
}

/// The query must be a non-blank string; nothing is called otherwise.
fn validate_query(body: Result<Json<SearchRequest>, JsonRejection>) -> Result<String, ApiError> {
    let missing = || ApiError::Validation("Query is required".to_string());

    let Json(req) = body.map_err(|_| missing())?;
    match req.query {
        Some(serde_json::Value::String(q)) if !q.trim().is_empty() => Ok(q.trim().to_string()),
        _ => Err(missing()),
    }
}

/// Run the full pipeline for an already-validated query.
pub async fn run_search(state: &AppState, query: &str) -> Result<SearchResponse, ApiError> {
    let config = &state.config.search;
    let started = Instant::now();

    // ── Step 1: Classify intent ──────────────────────────────
    let intent = classify(state.chat.as_ref(), config, query)
        .await
        .map_err(|source| ApiError::Upstream {
            stage: SearchStage::Classifying,
            source,
        })?;
    tracing::info!(
        stage = %SearchStage::Classifying,
        intent = %intent,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Intent classified"
    );

    // ── Step 2: Expand with the intent's strategy ────────────
    let template = select_prompt(intent);
    let raw = expand_query(state.chat.as_ref(), config, query, &template)
        .await
        .map_err(|source| ApiError::Upstream {
            stage: SearchStage::Expanding,
            source,
        })?;

    let phrases = sanitize_phrases(&raw, config);
    if phrases.is_empty() {
        tracing::warn!("No usable phrases from expansion. Raw: {raw}");
        return Err(ApiError::NoPhrases);
    }
    tracing::info!(
        stage = %SearchStage::Expanding,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Generated {} phrases: {:?}",
        phrases.len(),
        phrases
    );

    // ── Step 3: Parallel retrieval ───────────────────────────
    let phrase_results =
        retrieve_all(state.embedder.as_ref(), state.store.as_ref(), config, &phrases).await;
    tracing::debug!(
        stage = %SearchStage::Retrieving,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Retrieval complete"
    );

    // ── Step 4: Aggregate and rank ───────────────────────────
    let aggregation = aggregate(state.store.as_ref(), config, phrase_results).await;
    tracing::info!(
        stage = %SearchStage::Aggregating,
        intent = %intent,
        total_found = aggregation.total_found,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Search complete"
    );

    Ok(SearchResponse {
        generated_phrases: phrases,
        results: aggregation.results,
        total_found: aggregation.total_found,
    })
}
