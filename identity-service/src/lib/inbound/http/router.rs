use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_profile::get_profile;
use super::handlers::refresh::refresh;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::middleware::authenticate;
use crate::credential::ports::AuthenticatePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthenticatePort>,
    /// Notified when the process can no longer issue credentials
    pub shutdown: Arc<Notify>,
}

pub fn create_router(auth_service: Arc<dyn AuthenticatePort>, shutdown: Arc<Notify>) -> Router {
    let state = AppState {
        auth_service,
        shutdown,
    };

    let public_routes = Router::new()
        .route("/api/auth/sign-up", post(sign_up))
        .route("/api/auth/sign-in", post(sign_in))
        .route("/api/auth/refresh", post(refresh));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(get_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Headers are left out of the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::PasswordError;
    use axum::http::header::AUTHORIZATION;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::StatusCode;
    use mockall::mock;
    use serde_json::json;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::credential::errors::AuthError;
    use crate::credential::models::Authenticated;
    use crate::credential::models::CredentialId;
    use crate::credential::models::Identifier;
    use crate::credential::models::PersonName;
    use crate::credential::models::PublicProfile;
    use crate::credential::models::RoleName;
    use crate::credential::models::SignInCommand;
    use crate::credential::models::SignUpCommand;

    mock! {
        pub TestAuthService {}

        #[async_trait]
        impl AuthenticatePort for TestAuthService {
            async fn sign_in(&self, command: SignInCommand) -> Result<Authenticated, AuthError>;
            async fn sign_up(&self, command: SignUpCommand) -> Result<CredentialId, AuthError>;
            async fn refresh(&self, refresh_token: &str) -> Result<Authenticated, AuthError>;
            async fn authorize(&self, access_token: &str) -> Result<CredentialId, AuthError>;
            async fn get_profile(&self, id: &CredentialId) -> Result<PublicProfile, AuthError>;
        }
    }

    fn sign_up_request() -> Request<Body> {
        let body = json!({
            "identifier": "+99361234567",
            "first_name": "Aman",
            "last_name": "Orazov",
            "password": "correct-horse"
        });
        Request::builder()
            .method("POST")
            .uri("/api/auth/sign-up")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_created() {
        let id = CredentialId::new();
        let expected = id.to_string();

        let mut service = MockTestAuthService::new();
        service
            .expect_sign_up()
            .withf(|command| command.identifier.as_str() == "+99361234567")
            .times(1)
            .returning(move |_| Ok(id));

        let shutdown = Arc::new(Notify::new());
        let router = create_router(Arc::new(service), Arc::clone(&shutdown));

        let response = router.oneshot(sign_up_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["status_code"], 201);
        assert_eq!(body["data"]["id"], expected.as_str());
    }

    #[tokio::test]
    async fn test_sign_up_entropy_failure_triggers_shutdown() {
        let mut service = MockTestAuthService::new();
        service.expect_sign_up().times(1).returning(|_| {
            Err(AuthError::Password(PasswordError::RandomSourceUnavailable(
                "getrandom failed".to_string(),
            )))
        });

        let shutdown = Arc::new(Notify::new());
        let router = create_router(Arc::new(service), Arc::clone(&shutdown));

        let response = router.oneshot(sign_up_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let notified =
            tokio::time::timeout(Duration::from_millis(100), shutdown.notified()).await;
        assert!(notified.is_ok(), "shutdown was not requested");
    }

    #[tokio::test]
    async fn test_sign_in_entropy_failure_triggers_shutdown() {
        let mut service = MockTestAuthService::new();
        service.expect_sign_in().times(1).returning(|_| {
            Err(AuthError::Token(auth::JwtError::RandomSourceUnavailable(
                "getrandom failed".to_string(),
            )))
        });

        let shutdown = Arc::new(Notify::new());
        let router = create_router(Arc::new(service), Arc::clone(&shutdown));

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/sign-in")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "identifier": "+99361234567", "password": "correct-horse" }).to_string(),
            ))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let notified =
            tokio::time::timeout(Duration::from_millis(100), shutdown.notified()).await;
        assert!(notified.is_ok(), "shutdown was not requested");
    }

    #[tokio::test]
    async fn test_sign_up_validation_error_skips_service() {
        let mut service = MockTestAuthService::new();
        service.expect_sign_up().times(0);

        let router = create_router(Arc::new(service), Arc::new(Notify::new()));

        let body = json!({
            "identifier": "ab",
            "first_name": "Aman",
            "last_name": "Orazov",
            "password": "correct-horse"
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/sign-up")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_me_requires_bearer_token() {
        let mut service = MockTestAuthService::new();
        service.expect_authorize().times(0);
        service.expect_get_profile().times(0);

        let router = create_router(Arc::new(service), Arc::new(Notify::new()));

        let request = Request::builder()
            .uri("/api/auth/me")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = json_body(response).await;
        assert_eq!(body["data"]["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_me_accepts_lowercase_scheme() {
        let id = CredentialId::new();

        let mut service = MockTestAuthService::new();
        service
            .expect_authorize()
            .withf(|token| token == "access.token.value")
            .times(1)
            .returning(move |_| Ok(id));
        service
            .expect_get_profile()
            .withf(move |requested| *requested == id)
            .times(1)
            .returning(|requested| {
                Ok(PublicProfile {
                    id: *requested,
                    identifier: Identifier::new("+99361234567".to_string()).unwrap(),
                    first_name: PersonName::new("Aman".to_string()).unwrap(),
                    last_name: PersonName::new("Orazov".to_string()).unwrap(),
                    role: RoleName::default(),
                })
            });

        let router = create_router(Arc::new(service), Arc::new(Notify::new()));

        let request = Request::builder()
            .uri("/api/auth/me")
            .header(AUTHORIZATION, "bearer access.token.value")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["data"]["role"], "user");
    }

    #[tokio::test]
    async fn test_me_rejected_token_never_reaches_handler() {
        let mut service = MockTestAuthService::new();
        service
            .expect_authorize()
            .withf(|token| token == "expired.token.value")
            .times(1)
            .returning(|_| Err(AuthError::Token(auth::JwtError::TokenExpired)));
        service.expect_get_profile().times(0);

        let router = create_router(Arc::new(service), Arc::new(Notify::new()));

        let request = Request::builder()
            .uri("/api/auth/me")
            .header(AUTHORIZATION, "Bearer expired.token.value")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_in_malformed_identifier_is_invalid_credentials() {
        let mut service = MockTestAuthService::new();
        service.expect_sign_in().times(0);

        let router = create_router(Arc::new(service), Arc::new(Notify::new()));

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/sign-in")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "identifier": "a b", "password": "whatever" }).to_string(),
            ))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = json_body(response).await;
        assert_eq!(body["data"]["message"], "Invalid credentials");
    }
}
