use axum::Json;
use axum::extract::Query;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::models::*;
use crate::services::{StatusBuckets, filter_completed_missing_upcoming, filter_pending};
use crate::state::AppState;

#[derive(Deserialize)]
struct StatusQueryParams {
    #[serde(default)]
    now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkDoneResponse {
    pub matched: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/writeups", get(list_writeups).post(create_writeup).delete(reset_writeups))
        .route("/writeups/pending", get(list_pending))
        .route("/writeups/status", get(list_by_status))
        .route("/writeups/mark-done", post(mark_done))
        .route("/writeups/document", get(dump_document))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let _guard = state.lock.lock().await;
    state.store.try_load_all()?;
    Ok(StatusCode::OK)
}

async fn list_writeups(State(state): State<AppState>) -> Json<Vec<Writeup>> {
    let _guard = state.lock.lock().await;
    Json(state.store.load_all())
}

async fn list_pending(State(state): State<AppState>) -> Json<Vec<Writeup>> {
    let _guard = state.lock.lock().await;
    let writeups = state.store.load_all();
    Json(filter_pending(&writeups))
}

async fn list_by_status(
    State(state): State<AppState>,
    Query(params): Query<StatusQueryParams>,
) -> Json<StatusBuckets> {
    let now = params.now.unwrap_or_else(Utc::now);
    let writeups = {
        let _guard = state.lock.lock().await;
        state.store.load_all()
    };
    let buckets = filter_completed_missing_upcoming(&writeups, now);
    debug!(
        "classified at {}: {} completed, {} missing, {} upcoming",
        now,
        buckets.completed.len(),
        buckets.missing.len(),
        buckets.upcoming.len()
    );
    Json(buckets)
}

async fn create_writeup(
    State(state): State<AppState>,
    Json(req): Json<NewWriteupRequest>,
) -> Result<(StatusCode, Json<Writeup>), AppError> {
    let _guard = state.lock.lock().await;
    let writeup = state.store.create(req)?;
    Ok((StatusCode::CREATED, Json(writeup)))
}

async fn mark_done(
    State(state): State<AppState>,
    Json(req): Json<MarkDoneRequest>,
) -> Result<Json<MarkDoneResponse>, AppError> {
    let _guard = state.lock.lock().await;
    let matched = state.store.mark_done(&req.title, &req.course, &req.due)?;
    Ok(Json(MarkDoneResponse { matched }))
}

async fn reset_writeups(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let _guard = state.lock.lock().await;
    state.store.clear_all()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn dump_document(State(state): State<AppState>) -> Result<String, AppError> {
    let _guard = state.lock.lock().await;
    state.store.dump_document()?.ok_or(AppError::NotFound)
}
