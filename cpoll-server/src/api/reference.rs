//! Reference data endpoint

use axum::{extract::State, Json};
use cpoll_common::reference::ReferenceData;

use crate::AppState;

/// GET /api/reference/states
///
/// State → LGA mapping used by the intake form's selectors.
pub async fn get_states(State(state): State<AppState>) -> Json<ReferenceData> {
    Json(state.reference.as_ref().clone())
}
