use auth::TokenPair;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::service_error;
use super::ApiError;
use super::ApiSuccess;
use super::ProfileData;
use crate::credential::models::Authenticated;
use crate::credential::models::Identifier;
use crate::credential::models::SignInCommand;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequestBody>,
) -> Result<ApiSuccess<AuthenticatedResponseData>, ApiError> {
    // A malformed identifier cannot belong to anyone
    let identifier = Identifier::new(body.identifier)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let command = SignInCommand {
        identifier,
        password: body.password,
    };

    state
        .auth_service
        .sign_in(command)
        .await
        .map_err(|err| service_error(&state, err))
        .map(|ref authenticated| ApiSuccess::new(StatusCode::OK, authenticated.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequestBody {
    identifier: String,
    password: String,
}

/// Body shared by sign-in and refresh responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedResponseData {
    pub user: ProfileData,
    pub token: TokenPair,
}

impl From<&Authenticated> for AuthenticatedResponseData {
    fn from(authenticated: &Authenticated) -> Self {
        Self {
            user: (&authenticated.profile).into(),
            token: authenticated.tokens.clone(),
        }
    }
}
