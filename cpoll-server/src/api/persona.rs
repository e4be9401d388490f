//! Persona question endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use cpoll_common::persona::suggest_questions;
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaRequest {
    /// Older form builds post `question`
    #[serde(default, alias = "question")]
    pub question_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaReply {
    pub generated_text: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionList {
    pub suggestions: Vec<&'static str>,
}

/// POST /api/persona
///
/// Empty question → 422; completion failure or timeout → 502.
pub async fn ask_persona(
    State(state): State<AppState>,
    payload: Result<Json<PersonaRequest>, JsonRejection>,
) -> ApiResult<Json<PersonaReply>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let generated_text = state.persona.complete(&request.question_text).await?;
    Ok(Json(PersonaReply { generated_text }))
}

/// GET /api/persona/suggestions
pub async fn get_suggestions() -> Json<SuggestionList> {
    Json(SuggestionList {
        suggestions: suggest_questions(&mut rand::thread_rng()),
    })
}
