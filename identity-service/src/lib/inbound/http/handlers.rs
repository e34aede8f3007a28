use auth::PasswordError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::credential::errors::AuthError;
use crate::credential::models::PublicProfile;
use crate::inbound::http::router::AppState;

pub mod get_profile;
pub mod refresh;
pub mod sign_in;
pub mod sign_up;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const UNAUTHORIZED: &str = "Unauthorized";
const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

/// Convert a service error, requesting shutdown when it is fatal.
pub(crate) fn service_error(state: &AppState, err: AuthError) -> ApiError {
    if err.is_fatal() {
        tracing::error!(error = %err, fatal = true, "Cannot issue credentials, shutting down");
        state.shutdown.notify_one();
    }
    ApiError::from(err)
}

// Unknown identifier, wrong password and corrupt stored hashes must be
// indistinguishable to the client.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserNotFound
            | AuthError::InvalidPassword
            | AuthError::Password(
                PasswordError::MalformedHash(_)
                | PasswordError::UnsupportedVersion(_)
                | PasswordError::InvalidEncoding(_),
            ) => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
            AuthError::Token(ref e) if !e.is_server_side() => {
                ApiError::Unauthorized(UNAUTHORIZED.to_string())
            }
            AuthError::IdentifierAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthError::InvalidIdentifier(_)
            | AuthError::InvalidName(_)
            | AuthError::InvalidCredentialId(_) => ApiError::UnprocessableEntity(err.to_string()),
            AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::DatabaseError(_)
            | AuthError::Unknown(_) => {
                tracing::error!(error = %err, "Authentication request failed");
                ApiError::InternalServerError(INTERNAL_ERROR.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public profile as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub id: String,
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl From<&PublicProfile> for ProfileData {
    fn from(profile: &PublicProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            identifier: profile.identifier.as_str().to_string(),
            first_name: profile.first_name.as_str().to_string(),
            last_name: profile.last_name.as_str().to_string(),
            role: profile.role.as_str().to_string(),
        }
    }
}
