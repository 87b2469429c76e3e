use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use rail_api::state::{AppState, AuthConfig, Repositories};
use rail_api::{app, worker};
use rail_core::LocalIdentityProvider;
use rail_store::app_config::Config;
use rail_store::{DbClient, LocalPreferences, StorageBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn repositories(config: &Config) -> anyhow::Result<Repositories> {
    match config.database.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Repositories::in_memory())
        }
        StorageBackend::Postgres => {
            let db = DbClient::connect(&config.database)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            Ok(Repositories {
                profiles: Arc::new(db.profiles()),
                bookings: Arc::new(db.bookings()),
                notifications: Arc::new(db.notifications()),
            })
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rail_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting RailConnect API on port {}", config.server.port);

    let preferences = LocalPreferences::load(&config.preferences.path)
        .await
        .context("Failed to load local preferences")?;

    let app_state = AppState::new(
        repositories(&config).await?,
        Arc::new(LocalIdentityProvider::new()),
        preferences,
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    );

    tokio::spawn(worker::start_tracker_worker(
        app_state.tracker.clone(),
        config.tracker.refresh_seconds,
    ));

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
