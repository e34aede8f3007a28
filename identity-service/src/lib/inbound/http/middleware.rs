use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::credential::models::CredentialId;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated credential in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedCredential {
    pub credential_id: CredentialId,
}

/// Middleware that validates access tokens and adds the subject to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers())
        .map_err(IntoResponse::into_response)?
        .to_string();

    let credential_id = state.auth_service.authorize(&token).await.map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        ApiError::from(e).into_response()
    })?;

    req.extensions_mut()
        .insert(AuthenticatedCredential { credential_id });

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let unauthorized = || ApiError::Unauthorized("Unauthorized".to_string());

    let header = headers.get(AUTHORIZATION).ok_or_else(|| {
        tracing::debug!("Missing Authorization header");
        unauthorized()
    })?;

    let value = header.to_str().map_err(|_| unauthorized())?;

    let (scheme, token) = value.trim().split_once(' ').ok_or_else(unauthorized)?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(unauthorized());
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(unauthorized());
    }

    Ok(token)
}
