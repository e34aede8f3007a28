use std::sync::Arc;

use auth::Authenticator;
use auth::HashParameters;
use auth::JwtHandler;
use auth::TokenLifetimes;
use chrono::Duration;
use identity_service::credential::service::AuthenticationService;
use identity_service::inbound::http::router::create_router;
use identity_service::repositories::InMemoryCredentialStore;
use identity_service::repositories::InMemoryRoleResolver;
use serde_json::json;
use tokio::sync::Notify;

pub const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub store: Arc<InMemoryCredentialStore>,
    pub roles: Arc<InMemoryRoleResolver>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap hashing keeps the suite fast
        let parameters = HashParameters {
            memory_cost_kib: 256,
            iterations: 1,
            parallelism: 1,
            ..HashParameters::default()
        };
        let lifetimes = TokenLifetimes {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
        };
        let authenticator = Arc::new(
            Authenticator::new(SECRET, parameters, lifetimes)
                .expect("Failed to create authenticator"),
        );

        let store = Arc::new(InMemoryCredentialStore::new());
        let roles = Arc::new(InMemoryRoleResolver::new());
        let auth_service = Arc::new(AuthenticationService::new(
            Arc::clone(&store),
            Arc::clone(&roles),
            authenticator,
        ));

        let router = create_router(auth_service, Arc::new(Notify::new()));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let jwt_handler = JwtHandler::new(SECRET).expect("Failed to create JWT handler");

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler,
            store,
            roles,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register a credential and return its ID
    pub async fn sign_up(&self, identifier: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/sign-up")
            .json(&json!({
                "identifier": identifier,
                "first_name": "Aman",
                "last_name": "Orazov",
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"]
            .as_str()
            .expect("Missing credential id")
            .to_string()
    }

    /// Sign in and return the response body
    pub async fn sign_in(&self, identifier: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/sign-in")
            .json(&json!({
                "identifier": identifier,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
