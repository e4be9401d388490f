//! Survey response endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use cpoll_common::validation::validate_submission;
use cpoll_common::{ResponseRecord, ResponseSubmission};
use serde::Serialize;
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    /// Assigned by the SQL backend; absent for the file backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ResponseList {
    pub responses: Vec<ResponseRecord>,
}

/// POST /api/responses
///
/// Runs full validation before touching storage.
pub async fn submit_response(
    State(state): State<AppState>,
    payload: Result<Json<ResponseSubmission>, JsonRejection>,
) -> ApiResult<Json<SubmitResponse>> {
    let Json(submission) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let response = validate_submission(&submission, &state.reference)?;
    let stored = state.store.append(&response).await?;

    info!(
        state = %stored.state,
        lga = %stored.lga,
        backend = state.store.backend_name(),
        "Response saved"
    );

    Ok(Json(SubmitResponse {
        success: true,
        id: stored.id,
        created_at: stored.created_at,
    }))
}

/// GET /api/responses
///
/// Every stored record, unfiltered. Admin credential required.
pub async fn list_responses(State(state): State<AppState>) -> ApiResult<Json<ResponseList>> {
    let responses = state.store.list_all().await?;
    Ok(Json(ResponseList { responses }))
}
