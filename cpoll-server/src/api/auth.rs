//! Admin credential middleware
//!
//! Protected routes require `Authorization: Bearer <token>`; the token is
//! handed to the configured [`CredentialChecker`].
//!
//! [`CredentialChecker`]: cpoll_common::auth::CredentialChecker

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{ApiError, AppState};

/// Token from an `Authorization: Bearer` header, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware
///
/// Returns 401 when the credential is missing or rejected. Applied to admin
/// routes only; /health and the submission endpoints do not use it.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        return Err(ApiError::Unauthorized("Missing credential".to_string()));
    };

    if let Err(e) = state.credentials.verify(token).await {
        warn!(path = %request.uri().path(), "Admin credential rejected");
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
