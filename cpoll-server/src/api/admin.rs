//! Admin dashboard, login and export endpoints

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use cpoll_common::ResponseRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::bearer_token;
use crate::dashboard::{AdminViewState, DashboardView, FilterCriteria, PageSize};
use crate::export;
use crate::{ApiError, ApiResult, AppState};

/// Query parameters shared by the dashboard and the exports
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub lga: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub knows_romeo: String,
    #[serde(default)]
    pub knows_abdulrasheed: String,
    #[serde(default)]
    pub search: String,
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: usize,
    /// 10, 25, 50 or 100
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    PageSize::default().rows()
}

impl DashboardQuery {
    pub fn filters(&self) -> FilterCriteria {
        FilterCriteria {
            state: self.state.clone(),
            lga: self.lga.clone(),
            gender: self.gender.clone(),
            knows_romeo: self.knows_romeo.clone(),
            knows_abdulrasheed: self.knows_abdulrasheed.clone(),
            search: self.search.clone(),
        }
    }

    pub fn view_state(&self) -> ApiResult<AdminViewState> {
        let page_size = PageSize::from_rows(self.page_size).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "page_size must be 10, 25, 50 or 100 (got {})",
                self.page_size
            ))
        })?;
        Ok(AdminViewState::with_parts(self.filters(), page_size, self.page))
    }
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authenticated: bool,
}

/// POST /api/admin/login
///
/// Accepts `{"password": ...}` or a bearer token. 401 on mismatch.
pub async fn admin_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<LoginResponse>> {
    let from_body = if body.is_empty() {
        None
    } else {
        let parsed: LoginBody = serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid login body: {}", e)))?;
        Some(parsed.password).filter(|p| !p.is_empty())
    };

    let credential = from_body
        .as_deref()
        .or_else(|| bearer_token(&headers))
        .unwrap_or_default();

    state.credentials.verify(credential).await?;
    info!("Admin login succeeded");

    Ok(Json(LoginResponse {
        authenticated: true,
    }))
}

/// GET /api/admin/dashboard
///
/// Summary and chart cover every record; the table shows one page of the
/// filtered set.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardView>> {
    let view_state = query.view_state()?;
    let records = state.store.list_all().await?;
    Ok(Json(view_state.render(&records)))
}

/// GET /api/admin/export.csv
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Response> {
    let records = state.store.list_all().await?;
    let filters = query.filters();
    let filtered = filters.apply(&records);

    let bytes = export::csv::render_csv(&filtered)?;
    info!(rows = filtered.len(), "CSV export generated");

    Ok(attachment("text/csv; charset=utf-8", export::CSV_FILENAME, bytes))
}

/// GET /api/admin/export.pdf
pub async fn export_pdf(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Response> {
    let records = state.store.list_all().await?;
    let filters = query.filters();
    let filtered: Vec<ResponseRecord> = filters.apply(&records).into_iter().cloned().collect();
    let row_count = filtered.len();
    let generated_on = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let bytes = tokio::task::spawn_blocking(move || {
        let refs: Vec<&ResponseRecord> = filtered.iter().collect();
        export::pdf::render_pdf(&refs, &generated_on)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("PDF task failed: {}", e)))??;
    info!(rows = row_count, "PDF export generated");

    Ok(attachment("application/pdf", export::PDF_FILENAME, bytes))
}

fn attachment(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}
