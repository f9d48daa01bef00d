//! HTTP Server for the EcoWeek site.
//!
//! # API Endpoints
//!
//! | Method | Path                | Description                          |
//! |--------|---------------------|--------------------------------------|
//! | GET    | `/health`           | Health check                         |
//! | GET    | `/api/stats`        | Aggregated survey statistics         |
//! | GET    | `/data/ECOWEEK.csv` | Raw survey export                    |
//! | GET    | `/api/comments`     | Community comments, newest first     |
//! | POST   | `/api/comments`     | Submit a comment                     |
//! | GET    | `/api/trivia`       | Trivia question bank                 |
//! | POST   | `/api/trivia/spin`  | Spin the category wheel              |
//! | GET    | `/survey`           | Redirect to the external survey form |

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeFile, trace::TraceLayer};
use tracing::{error, info, warn};

use super::types::{error_response, SpinResponse, StatsResponse};
use crate::comments::{CommentStore, MemoryStore, SupabaseStore};
use crate::config::AppConfig;
use crate::error::{CommentError, ServerResult};
use crate::models::{Comment, NewComment};
use crate::parser::load_bytes;
use crate::trivia::QuestionBank;

type ApiError = (StatusCode, Json<Value>);

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub comments: Arc<dyn CommentStore>,
    pub trivia: &'static QuestionBank,
}

impl AppState {
    /// Pick the comment store the configuration asks for.
    pub fn from_config(config: AppConfig) -> Self {
        let comments: Arc<dyn CommentStore> = match &config.supabase {
            Some(supabase) => Arc::new(SupabaseStore::from_config(supabase)),
            None => {
                warn!("SUPABASE_URL not set, comments are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };

        Self {
            config: Arc::new(config),
            comments,
            trivia: QuestionBank::builtin(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let export = ServeFile::new(&state.config.csv_path);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/stats", get(stats))
        .route("/api/comments", get(list_comments).post(submit_comment))
        .route("/api/trivia", get(trivia))
        .route("/api/trivia/spin", post(spin))
        .route("/survey", get(survey))
        .route_service("/data/ECOWEEK.csv", export)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig) -> ServerResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(csv = %config.csv_path.display(), "serving survey export");

    let app = router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("EcoWeek server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ecoweek",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Read the export from disk and aggregate it
async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let unavailable = |e: &dyn std::fmt::Display| {
        error!("survey source unavailable: {}", e);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(error_response("Survey data is unavailable")),
        )
    };

    let bytes = tokio::fs::read(&state.config.csv_path)
        .await
        .map_err(|e| unavailable(&e))?;
    let source = load_bytes(&bytes).map_err(|e| unavailable(&e))?;

    info!(responses = source.records.len(), "survey statistics computed");
    Ok(Json(StatsResponse::from_source(source, Utc::now())))
}

fn comment_error(e: CommentError) -> ApiError {
    match e {
        CommentError::Invalid(problems) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "status": "error",
                "error": "Invalid comment",
                "problems": problems,
            })),
        ),
        other => {
            error!("comment store failure: {}", other);
            (
                StatusCode::BAD_GATEWAY,
                Json(error_response("Comment service is unavailable")),
            )
        }
    }
}

async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.comments.list().await.map_err(comment_error)?;
    Ok(Json(comments))
}

async fn submit_comment(
    State(state): State<AppState>,
    Json(comment): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let stored = state.comments.submit(comment).await.map_err(comment_error)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn trivia(State(state): State<AppState>) -> Json<&'static QuestionBank> {
    Json(state.trivia)
}

async fn spin(State(state): State<AppState>) -> Result<Json<SpinResponse>, ApiError> {
    let landed = state.trivia.spin(&mut rand::thread_rng());
    let prize_number = landed.ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(error_response("No trivia categories available")),
        )
    })?;

    let category = state
        .trivia
        .by_index(prize_number)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string()))))?
        .clone();

    Ok(Json(SpinResponse {
        prize_number,
        category,
    }))
}

async fn survey(State(state): State<AppState>) -> Response {
    match &state.config.survey_url {
        Some(url) => Redirect::temporary(url).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(error_response("Survey link is not configured")),
        )
            .into_response(),
    }
}
