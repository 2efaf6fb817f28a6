mod analysis;
mod api;
mod config;
mod fallback;
mod hashtags;
mod llm;
mod parse;

use axum::{routing::post, Router};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::llm::OpenRouterClient;

#[derive(OpenApi)]
#[openapi(
    paths(api::analyze_hashtags),
    components(
        schemas(
            api::AnalyzeRequest,
            api::ErrorResponse,
            analysis::AnalysisResponse,
            analysis::Source
        )
    ),
    tags(
        (name = "analyzer", description = "Hashtag Popularity API")
    )
)]
struct ApiDoc;

pub fn router(state: Arc<api::AppState>, static_dir: &str) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/analyze", post(api::analyze_hashtags))
        .fallback_service(ServeDir::new(static_dir)) // Analyzer page
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hashtag_analyzer=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    if config.api_key.is_none() {
        warn!("🔑 OPENROUTER_API_KEY is not set; analysis requests will fail with 500");
    }

    let client = OpenRouterClient::new(config.api_url.clone(), config.upstream_timeout)
        .context("failed to build HTTP client")?;
    let analyzer = Analyzer::new(
        config.api_key.clone(),
        Arc::new(client),
        config.random,
        config.model.clone(),
    );
    let state = Arc::new(api::AppState { analyzer });

    let app = router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("🚀 Listening on {}", listener.local_addr()?);
    info!("📚 Swagger UI at /swagger-ui, model {}", config.model.model);
    axum::serve(listener, app).await?;

    Ok(())
}
