use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};
use usecase_scout::models::{AnalysisRequest, AnalysisResponse};
use usecase_scout::stages::Pipeline;
use usecase_scout::tools::tavily::TavilyClient;
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    runs: Arc<DashMap<String, AnalysisResponse>>,
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("usecase_scout=debug,tower_http=info")
        .init();

    let output_dir = std::env::var("SCOUT_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    tokio::fs::create_dir_all(&output_dir).await?;

    let state = AppState {
        runs: Arc::new(DashMap::new()),
        output_dir,
    };

    let app = Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/runs/:id", get(run_by_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("use-case scout dashboard running on http://0.0.0.0:3000");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../assets/dashboard.html"))
}

async fn health() -> &'static str {
    "OK"
}

#[instrument(skip(state))]
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, StatusCode> {
    let start_time = std::time::Instant::now();
    let run_id = Uuid::new_v4().to_string();

    info!("starting analysis run {} for {}", run_id, req.company);

    let tavily = TavilyClient::from_env().map_err(|e| {
        tracing::error!("search client unavailable: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let pipeline = Pipeline::new(tavily, &state.output_dir);
    let (ctx, stage_times) = pipeline.run(&req.company).await.map_err(|e| {
        tracing::error!("analysis run failed: {:#}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!("analysis run completed in {:?}", start_time.elapsed());

    let response = AnalysisResponse {
        run_id: run_id.clone(),
        company: ctx.company,
        search_hits: ctx.search_hits,
        synthesis: ctx.synthesis,
        use_cases: ctx.use_cases,
        additional_resources: ctx.additional_resources,
        dataset_links: ctx.dataset_links,
        proposals: ctx.proposals,
        stage_times,
        total_time_ms: start_time.elapsed().as_millis() as u64,
        completed_at: Utc::now(),
    };

    state.runs.insert(run_id, response.clone());
    Ok(Json(response))
}

#[instrument(skip(state))]
async fn run_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, StatusCode> {
    state
        .runs
        .get(&id)
        .map(|run| Json(run.value().clone()))
        .ok_or(StatusCode::NOT_FOUND)
}
