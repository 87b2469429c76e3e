use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

use crate::app_config::DatabaseConfig;
use crate::{PgBookingRepository, PgNotificationRepository, PgProfileRepository};

/// Postgres pool shared by the three document repositories.
#[derive(Clone)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let url = config.url.as_deref().ok_or_else(|| {
            sqlx::Error::Configuration("database.url is required for the postgres backend".into())
        })?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(url)
            .await?;

        info!("Connected to Postgres with up to {} connections", config.max_connections);
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running document migrations...");
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        info!("Profiles, bookings and notifications tables are up to date.");
        Ok(())
    }

    pub fn profiles(&self) -> PgProfileRepository {
        PgProfileRepository::new(self.pool.clone())
    }

    pub fn bookings(&self) -> PgBookingRepository {
        PgBookingRepository::new(self.pool.clone())
    }

    pub fn notifications(&self) -> PgNotificationRepository {
        PgNotificationRepository::new(self.pool.clone())
    }
}
