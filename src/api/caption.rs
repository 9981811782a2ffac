use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::error::ApiError;
use crate::llm::caption::generate_caption;
use crate::models::{CaptionRequest, CaptionResponse};
use crate::state::AppState;

/// POST /api/caption - Social caption + hashtags for a clip's spoken content.
pub async fn caption(
    State(state): State<AppState>,
    body: Result<Json<CaptionRequest>, JsonRejection>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let content = body
        .ok()
        .and_then(|Json(req)| req.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("Content is required".to_string()))?;

    let caption = generate_caption(state.chat.as_ref(), &content)
        .await
        .map_err(ApiError::Caption)?;

    Ok(Json(CaptionResponse { caption }))
}
