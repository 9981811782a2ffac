use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::search::SearchStage;

/// Request-level failures. Every variant renders as `{ "error": <message> }`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    /// A classifier or expansion model call failed.
    #[error("{stage} failed: {source:#}")]
    Upstream {
        stage: SearchStage,
        source: anyhow::Error,
    },

    #[error("Failed to generate search phrases")]
    NoPhrases,

    #[error("Caption generation failed: {0:#}")]
    Caption(anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } | Self::NoPhrases | Self::Caption(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the caller. Upstream details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Upstream { .. } => "Internal server error".to_string(),
            Self::NoPhrases => self.to_string(),
            Self::Caption(_) => "Failed to generate caption".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Validation(message) => {
                tracing::debug!(%message, "Rejected request");
            }
            _ => {
                tracing::error!(error = %self, "Request failed");
            }
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400_with_message() {
        let (status, body) = body_json(ApiError::Validation("Query is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Query is required" }));
    }

    #[tokio::test]
    async fn test_upstream_hides_details() {
        let err = ApiError::Upstream {
            stage: SearchStage::Classifying,
            source: anyhow::anyhow!("OpenAI chat API returned 401: bad key"),
        };
        assert!(err.to_string().contains("classifying failed"));

        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_no_phrases_is_distinguishable() {
        let (status, body) = body_json(ApiError::NoPhrases).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to generate search phrases" }));
    }

    #[tokio::test]
    async fn test_caption_failure_message() {
        let (_, body) = body_json(ApiError::Caption(anyhow::anyhow!("timeout"))).await;
        assert_eq!(body["error"], "Failed to generate caption");
    }
}
