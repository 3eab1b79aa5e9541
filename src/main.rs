//! Neoterik Server: email/password accounts with stateless cookie sessions.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use neoterik_api::state::AppState;
use neoterik_auth::{JwtDecoder, JwtEncoder, PasswordHasher, SessionCookie, SessionManager, SigningSecret};
use neoterik_core::config::AppConfig;
use neoterik_core::error::AppError;
use neoterik_database::{DatabasePool, MemoryUserRepository, PgUserRepository, UserRepository};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("NEOTERIK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        environment = %config.environment,
        "Starting Neoterik v{}",
        env!("CARGO_PKG_VERSION")
    );

    // ── Step 1: Signing secret ───────────────────────────────────
    let secret = SigningSecret::resolve(&config.auth, config.environment)?;

    // ── Step 2: User store ───────────────────────────────────────
    let (user_repo, db_pool) = build_user_repository(&config).await?;

    // ── Step 3: Auth system ──────────────────────────────────────
    tracing::info!("Initializing authentication system...");
    let password_hasher = Arc::new(PasswordHasher::new(&config.auth)?);
    let jwt_encoder = Arc::new(JwtEncoder::new(&secret));
    let jwt_decoder = Arc::new(JwtDecoder::new(&secret));
    let session_cookie = SessionCookie::for_environment(config.environment);

    let session_manager = SessionManager::new(
        user_repo,
        password_hasher,
        jwt_encoder,
        jwt_decoder,
        session_cookie,
    );

    // ── Step 4: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = neoterik_api::build_router(AppState::new(config, session_manager));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Neoterik server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(pool) = db_pool {
        if tokio::time::timeout(grace, pool.close()).await.is_err() {
            tracing::warn!("Database pool did not close within the grace period");
        }
    }

    tracing::info!("Neoterik server shut down gracefully");
    Ok(())
}

/// PostgreSQL when `database.url` is set, otherwise an in-memory store.
async fn build_user_repository(
    config: &AppConfig,
) -> Result<(Arc<dyn UserRepository>, Option<DatabasePool>), AppError> {
    let Some(url) = config.database.url.as_deref() else {
        if config.is_production() {
            tracing::warn!("No database configured; accounts will be lost on restart");
        } else {
            tracing::info!("No database configured, using in-memory user store");
        }
        return Ok((Arc::new(MemoryUserRepository::new()), None));
    };

    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(url, &config.database).await?;

    tracing::info!("Running database migrations...");
    neoterik_database::migration::run_migrations(db_pool.pool()).await?;
    tracing::info!("Database migrations complete");

    let repo = PgUserRepository::new(db_pool.pool().clone());
    Ok((Arc::new(repo), Some(db_pool)))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
