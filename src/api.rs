//! HTTP handlers and request/response types.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::analysis::{AnalysisResponse, AnalyzeError, Analyzer};

pub struct AppState {
    pub analyzer: Analyzer,
}

/// Documented request body. The handler reads the raw bytes instead, so the
/// Content-Type header is ignored and a non-object body is a 400.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Comma-separated hashtags, with or without the leading `#`
    #[schema(example = "#travel, food, #photography")]
    pub hashtags: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Hashtags are required")]
    pub error: String,
}

pub struct ApiError(AnalyzeError);

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let AnalyzeError::Internal(detail) = &self.0 {
            error!("🔥 Analysis error: {}", detail);
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (self.0.status(), Json(body)).into_response()
    }
}

/// Analyze hashtag popularity per country
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis from the model or synthesized fallback", body = AnalysisResponse),
        (status = 400, description = "Missing or empty hashtags", body = ErrorResponse),
        (status = 500, description = "Missing API key or malformed request", body = ErrorResponse)
    ),
    tag = "analyzer"
)]
pub async fn analyze_hashtags(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| AnalyzeError::Internal(format!("invalid JSON body: {}", e)))?;
    if body.is_null() {
        return Err(AnalyzeError::Internal("request body is null".to_string()).into());
    }

    // Arrays and primitives have no `hashtags` field.
    let hashtags = body.get("hashtags").and_then(Value::as_str);

    let response = state.analyzer.analyze(hashtags).await?;
    Ok(Json(response))
}
