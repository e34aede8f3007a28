use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::sign_in::AuthenticatedResponseData;
use super::service_error;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// Exchange the refresh token in the `Authorization` header for a new pair.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<AuthenticatedResponseData>, ApiError> {
    let refresh_token = bearer_token(&headers)?;

    state
        .auth_service
        .refresh(refresh_token)
        .await
        .map_err(|err| service_error(&state, err))
        .map(|ref authenticated| ApiSuccess::new(StatusCode::OK, authenticated.into()))
}
