//! Axum route handlers for the Bid Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::analyzer::AnalysisResult;
use crate::analysis::features::coerce_amount;
use crate::analysis::prefill::build_prefill;
use crate::errors::AppError;
use crate::models::bid::{BidDraft, BidRow};
use crate::models::project::{ProjectRow, ProjectSummary};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBidRequest {
    pub project_id: Option<Uuid>,
    /// Inline summary wins over a lookup by `project_id`. Both absent is
    /// fine; the analyzer falls back to its budget/category defaults.
    pub project: Option<ProjectSummary>,
    pub bid_data: BidDraft,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBidRequest {
    pub project_id: Uuid,
    pub bid_data: BidDraft,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBidResponse {
    pub bid_id: Uuid,
    pub analysis: AnalysisResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/bids/analyze
///
/// Live analysis for the submission UI. Always returns a usable
/// AnalysisResult; a dead prediction service is not an error here.
pub async fn handle_analyze_bid(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeBidRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let project = resolve_project(&state, request.project, request.project_id).await?;

    let analysis = state
        .analyzer
        .analyze(project.as_ref(), &request.bid_data)
        .await;

    Ok(Json(analysis))
}

/// POST /api/v1/bids
///
/// Persists the bid with its analysis attached as an opaque JSONB blob.
pub async fn handle_submit_bid(
    State(state): State<AppState>,
    Json(request): Json<SubmitBidRequest>,
) -> Result<Json<SubmitBidResponse>, AppError> {
    if coerce_amount(&request.bid_data.cost.total) <= 0.0 {
        return Err(AppError::Validation(
            "bid cost total must be a positive amount".to_string(),
        ));
    }

    let project = get_project(&state, request.project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", request.project_id)))?;

    let analysis = state
        .analyzer
        .analyze(Some(&project.summary()), &request.bid_data)
        .await;

    let bid_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO bids (id, project_id, bid_data, analysis, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(bid_id)
    .bind(request.project_id)
    .bind(serde_json::to_value(&request.bid_data).map_err(|e| AppError::Internal(e.into()))?)
    .bind(serde_json::to_value(&analysis).map_err(|e| AppError::Internal(e.into()))?)
    .bind(Utc::now())
    .execute(&state.db)
    .await?;

    Ok(Json(SubmitBidResponse { bid_id, analysis }))
}

/// GET /api/v1/bids/:id
pub async fn handle_get_bid(
    State(state): State<AppState>,
    Path(bid_id): Path<Uuid>,
) -> Result<Json<BidRow>, AppError> {
    let bid = sqlx::query_as::<_, BidRow>("SELECT * FROM bids WHERE id = $1")
        .bind(bid_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bid {bid_id} not found")))?;

    Ok(Json(bid))
}

/// GET /api/v1/projects/:id/prefill
///
/// Drafts a starting bid for the project from its budget and deadline.
pub async fn handle_prefill(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<BidDraft>, AppError> {
    let project = get_project(&state, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))?;

    let draft = build_prefill(&project, Utc::now().date_naive());
    Ok(Json(draft))
}

async fn resolve_project(
    state: &AppState,
    inline: Option<ProjectSummary>,
    project_id: Option<Uuid>,
) -> Result<Option<ProjectSummary>, AppError> {
    if inline.is_some() {
        return Ok(inline);
    }
    let Some(project_id) = project_id else {
        return Ok(None);
    };
    let project = get_project(state, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))?;
    Ok(Some(project.summary()))
}

async fn get_project(state: &AppState, project_id: Uuid) -> Result<Option<ProjectRow>, AppError> {
    let project = sqlx::query_as::<_, ProjectRow>(
        "SELECT id, budget, category, deadline FROM projects WHERE id = $1",
    )
    .bind(project_id)
    .fetch_optional(&state.db)
    .await?;
    Ok(project)
}
