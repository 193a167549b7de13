//! HTTP API surface
//!
//! Routes and validates incoming requests, dispatches to the journal
//! service, and maps errors to status codes: validation → 400, unknown id
//! → 404, everything else → 500. Errors from the primary persistence path
//! always surface here; enrichment failures never do (they are absorbed
//! inside the journal).


use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::JournalError;
use crate::journal::{Insights, Journal};
use crate::settings::{Theme, ThemeStore};
use crate::types::{NewTrade, TradePatch, TradeRecord};

/// Shared state for all handlers
pub struct AppState {
    pub journal: Journal,
    pub themes: ThemeStore,
}

/// Build the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trades", post(create_trade).get(list_trades))
        .route(
            "/trades/{id}",
            get(get_trade).put(update_trade).delete(delete_trade),
        )
        .route("/ai/analyze", post(analyze))
        .route("/ai/insights", get(insights))
        .route("/chat", post(chat))
        .route("/settings/theme", get(get_theme).post(set_theme))
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> crate::error::Result<()> {
    let app = create_router(state);
    let addr = format!("{}:{}", host, port);

    tracing::info!("Journal API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Status code for a service error
pub fn status_for(err: &JournalError) -> StatusCode {
    match err {
        JournalError::Validation(_) => StatusCode::BAD_REQUEST,
        JournalError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Service error carried out of a handler
struct ApiError(JournalError);

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewTrade>,
) -> ApiResult<(StatusCode, Json<TradeRecord>)> {
    let trade = state.journal.create_trade(new).await?;
    Ok((StatusCode::CREATED, Json(trade)))
}

async fn list_trades(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<TradeRecord>>> {
    Ok(Json(state.journal.list_trades().await?))
}

async fn get_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TradeRecord>> {
    Ok(Json(state.journal.get_trade(id).await?))
}

async fn update_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TradePatch>,
) -> ApiResult<Json<TradeRecord>> {
    Ok(Json(state.journal.update_trade(id, patch).await?))
}

async fn delete_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.journal.delete_trade(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    trade_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    trade_id: Uuid,
    analysis: String,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let trade_id = req
        .trade_id
        .ok_or_else(|| ApiError(JournalError::Validation("trade_id is required".into())))?;
    let analysis = state.journal.analyze(trade_id).await?;
    Ok(Json(AnalyzeResponse { trade_id, analysis }))
}

async fn insights(State(state): State<Arc<AppState>>) -> ApiResult<Json<Insights>> {
    Ok(Json(state.journal.insights().await?))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if let Some(user_id) = req.user_id {
        // History is not scoped per user yet
        tracing::debug!("chat request scoped to user {}", user_id);
    }
    let response = state.journal.chat(&req.message).await?;
    Ok(Json(ChatResponse { response }))
}

#[derive(Debug, Deserialize)]
struct ThemeRequest {
    theme: Theme,
}

#[derive(Debug, Serialize)]
struct ThemeResponse {
    theme: Theme,
}

async fn get_theme(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: state.themes.get(),
    })
}

async fn set_theme(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ThemeRequest>,
) -> ApiResult<Json<ThemeResponse>> {
    state.themes.set(req.theme)?;
    Ok(Json(ThemeResponse { theme: req.theme }))
}
