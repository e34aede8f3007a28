use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::service_error;
use super::ApiError;
use super::ApiSuccess;
use crate::credential::errors::IdentifierError;
use crate::credential::errors::NameError;
use crate::credential::models::Identifier;
use crate::credential::models::PersonName;
use crate::credential::models::SignUpCommand;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .auth_service
        .sign_up(command)
        .await
        .map_err(|err| service_error(&state, err))
        .map(|id| {
            ApiSuccess::new(
                StatusCode::CREATED,
                SignUpResponseData { id: id.to_string() },
            )
        })
}

/// HTTP request body for registering a credential (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequest {
    identifier: String,
    first_name: String,
    last_name: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignUpRequestError {
    #[error("Invalid identifier: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("Invalid name: {0}")]
    Name(#[from] NameError),

    #[error("Password must not be empty")]
    EmptyPassword,
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<SignUpCommand, ParseSignUpRequestError> {
        let identifier = Identifier::new(self.identifier)?;
        let first_name = PersonName::new(self.first_name)?;
        let last_name = PersonName::new(self.last_name)?;
        if self.password.is_empty() {
            return Err(ParseSignUpRequestError::EmptyPassword);
        }
        Ok(SignUpCommand::new(
            identifier,
            first_name,
            last_name,
            self.password,
        ))
    }
}

impl From<ParseSignUpRequestError> for ApiError {
    fn from(err: ParseSignUpRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpResponseData {
    pub id: String,
}
