//! The hashtag analysis operation: validation, upstream call and fallback.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::fallback::{generate_fallback, RandomSource};
use crate::hashtags::{normalize_hashtags, AnalysisResult};
use crate::llm::{build_prompt, ChatCompletion, ChatRequest, UpstreamError};
use crate::parse::parse_analysis;

/// Where the returned numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Api,
    Fallback,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisResponse {
    /// Hashtag -> country -> usage count
    #[schema(value_type = Object, example = json!({"#travel": {"USA": 1830, "India": 942}}))]
    pub analysis: AnalysisResult,
    #[schema(example = json!(["#travel", "#food"]))]
    pub hashtags: Vec<String>,
    pub source: Source,
}

/// Failures reported to the caller. Upstream failures are never among them.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Hashtags are required")]
    HashtagsRequired,
    #[error("Please provide valid hashtags")]
    NoValidHashtags,
    #[error("API configuration error")]
    MissingApiKey,
    #[error("Internal server error")]
    Internal(String),
}

impl AnalyzeError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::HashtagsRequired | AnalyzeError::NoValidHashtags => StatusCode::BAD_REQUEST,
            AnalyzeError::MissingApiKey | AnalyzeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Why the upstream attempt produced nothing usable.
#[derive(Debug, Error)]
pub enum FailureReason {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("could not parse model reply: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of one all-or-nothing upstream attempt.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Succeeded(AnalysisResult),
    Failed(FailureReason),
}

/// Model parameters sent with every request.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub struct Analyzer {
    api_key: Option<String>,
    client: Arc<dyn ChatCompletion>,
    random: RandomSource,
    settings: ModelSettings,
}

impl Analyzer {
    pub fn new(
        api_key: Option<String>,
        client: Arc<dyn ChatCompletion>,
        random: RandomSource,
        settings: ModelSettings,
    ) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
            random,
            settings,
        }
    }

    /// Analyze the raw, comma-separated `hashtags` field of a request.
    pub async fn analyze(&self, hashtags: Option<&str>) -> Result<AnalysisResponse, AnalyzeError> {
        let raw = match hashtags {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Err(AnalyzeError::HashtagsRequired),
        };

        let hashtags = normalize_hashtags(raw);
        if hashtags.is_empty() {
            return Err(AnalyzeError::NoValidHashtags);
        }

        let api_key = self.api_key.as_deref().ok_or(AnalyzeError::MissingApiKey)?;

        let fallback = generate_fallback(&hashtags, &mut self.random.rng());

        let response = match self.request_analysis(api_key, &hashtags).await {
            AnalysisOutcome::Succeeded(analysis) => {
                info!("📊 Analysis for {} hashtag(s) served from model", hashtags.len());
                AnalysisResponse {
                    analysis,
                    hashtags,
                    source: Source::Api,
                }
            }
            AnalysisOutcome::Failed(reason) => {
                warn!("⚠️ Using fallback data for {:?}: {}", hashtags, reason);
                AnalysisResponse {
                    analysis: fallback,
                    hashtags,
                    source: Source::Fallback,
                }
            }
        };

        Ok(response)
    }

    async fn request_analysis(&self, api_key: &str, hashtags: &[String]) -> AnalysisOutcome {
        let request = ChatRequest::user_prompt(
            &self.settings.model,
            build_prompt(hashtags),
            self.settings.temperature,
            self.settings.max_tokens,
        );

        let content = match self.client.complete(api_key, &request).await {
            Ok(content) => content,
            Err(e) => return AnalysisOutcome::Failed(e.into()),
        };
        debug!("Model reply: {}", content);

        match parse_analysis(&content) {
            Ok(analysis) => AnalysisOutcome::Succeeded(analysis),
            Err(e) => AnalysisOutcome::Failed(e.into()),
        }
    }
}
