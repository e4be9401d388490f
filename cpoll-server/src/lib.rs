//! cpoll-server library - campaign polling HTTP service
//!
//! Public routes take survey submissions and persona questions; admin routes
//! (credential required) serve the stored responses, the dashboard and the
//! exports.

use axum::Router;
use cpoll_common::auth::CredentialChecker;
use cpoll_common::persona::PersonaCompleter;
use cpoll_common::reference::ReferenceData;
use cpoll_common::ResponseStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod services;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Configured response store backend
    pub store: Arc<dyn ResponseStore>,
    pub persona: Arc<dyn PersonaCompleter>,
    /// Admin credential verification
    pub credentials: Arc<dyn CredentialChecker>,
    /// State/LGA mapping used for validation and form options
    pub reference: Arc<ReferenceData>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ResponseStore>,
        persona: Arc<dyn PersonaCompleter>,
        credentials: Arc<dyn CredentialChecker>,
        reference: Arc<ReferenceData>,
    ) -> Self {
        Self {
            store,
            persona,
            credentials,
            reference,
        }
    }
}

/// Build application router
///
/// Admin routes sit behind the credential middleware; the login route checks
/// its own credential so it can also accept a JSON body.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require admin credential)
    let protected = Router::new()
        .route("/api/responses", get(api::list_responses))
        .route("/api/admin/dashboard", get(api::get_dashboard))
        .route("/api/admin/export.csv", get(api::export_csv))
        .route("/api/admin/export.pdf", get(api::export_pdf))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::admin_auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/responses", post(api::submit_response))
        .route("/api/persona", post(api::ask_persona))
        .route("/api/persona/suggestions", get(api::get_suggestions))
        .route("/api/reference/states", get(api::get_states))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/admin/login", post(api::admin_login))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
