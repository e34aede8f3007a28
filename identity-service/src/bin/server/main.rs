use std::sync::Arc;

use auth::Authenticator;
use identity_service::config::Config;
use identity_service::credential::ports::AuthenticatePort;
use identity_service::credential::service::AuthenticationService;
use identity_service::inbound::http::router::create_router;
use identity_service::repositories::InMemoryCredentialStore;
use identity_service::repositories::InMemoryRoleResolver;
use identity_service::repositories::PostgresCredentialStore;
use identity_service::repositories::PostgresRoleResolver;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Notify;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        persistent = config.database.url.is_some(),
        access_token_ttl_seconds = config.jwt.access_token_ttl_seconds,
        refresh_token_ttl_seconds = config.jwt.refresh_token_ttl_seconds,
        memory_cost_kib = config.password.memory_cost_kib,
        iterations = config.password.iterations,
        parallelism = config.password.parallelism,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.password,
        config.jwt.lifetimes()?,
    )?);

    let auth_service: Arc<dyn AuthenticatePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AuthenticationService::new(
                Arc::new(PostgresCredentialStore::new(pg_pool.clone())),
                Arc::new(PostgresRoleResolver::new(pg_pool)),
                authenticator,
            ))
        }
        None => {
            tracing::warn!("No database configured, credentials are kept in memory");
            Arc::new(AuthenticationService::new(
                Arc::new(InMemoryCredentialStore::new()),
                Arc::new(InMemoryRoleResolver::new()),
                authenticator,
            ))
        }
    };

    let shutdown = Arc::new(Notify::new());

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, Arc::clone(&shutdown));

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server exited");

    Ok(())
}

async fn shutdown_signal(shutdown: Arc<Notify>) {
    tokio::select! {
        _ = shutdown.notified() => {
            tracing::error!("Fatal error reported, shutting down");
        }
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        }
    }
}
