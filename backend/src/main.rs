//! Movie API Backend
//!
//! REST service for the movie club: registration, login and account
//! management behind bearer-token authentication.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Auth: password hashing, JWT issuance/verification, route guard
//! - Services: account operations
//! - Repositories: user store and movie catalog (PostgreSQL or in-process)

use anyhow::Result;
use movie_api_backend::{
    config,
    db,
    repositories::{
        sample_catalog, InMemoryMovieRepository, InMemoryUserRepository, MovieStore,
        PgMovieRepository, PgUserRepository, UserStore,
    },
    routes,
    state::AppState,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting Movie API Backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let (users, movies) = create_stores(&config).await?;

    let state = AppState::new(users, movies, &config)?;
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Pick the user store and movie catalog from configuration
///
/// An empty database URL selects the in-process stores: accounts are lost
/// on restart and the catalog is the built-in sample.
async fn create_stores(
    config: &config::AppConfig,
) -> Result<(Arc<dyn UserStore>, Arc<dyn MovieStore>)> {
    if config.database.url.is_empty() {
        warn!("No database URL configured, using in-memory stores");
        return Ok((
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryMovieRepository::with_movies(sample_catalog())),
        ));
    }

    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    // production runs migrations as a separate job
    if !config::AppConfig::is_production() {
        db::run_migrations(&db_pool).await?;
    }

    Ok((
        Arc::new(PgUserRepository::new(db_pool.clone())),
        Arc::new(PgMovieRepository::new(db_pool)),
    ))
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "movie_api_backend=info,tower_http=info".into()
        } else {
            "movie_api_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Refuse to start in production with development-grade settings
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let errors = config.production_errors();

    if config.database.url.is_empty() {
        warn!("Running in production without a database; accounts will not persist");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
