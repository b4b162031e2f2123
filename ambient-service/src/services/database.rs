//! SQLite-backed storage for the token registry and the hourly temperature
//! log.

use crate::models::{DeviceToken, HourlyTemperatureLog, TemperatureSlot, HOURS_PER_DAY};
use service_core::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (and create if missing) the database behind the given URL.
    #[instrument(skip(database_url), fields(service = "ambient-service"))]
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("SQLite connection pool established");

        Ok(Self { pool })
    }

    /// Close the pool. Subsequent queries fail with a pool-closed error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Token Registry
    // -------------------------------------------------------------------------

    /// Append a device token. Duplicates are accepted; there is no delete.
    #[instrument(skip(self, device))]
    pub async fn insert_token(&self, device: &DeviceToken) -> Result<(), AppError> {
        sqlx::query("INSERT INTO tokens (token, registered_at) VALUES (?, ?)")
            .bind(&device.token)
            .bind(device.registered_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert token: {}", e))
            })?;

        info!("Device token stored");
        Ok(())
    }

    /// Full scan of every registered token, insertion order.
    #[instrument(skip(self))]
    pub async fn list_tokens(&self) -> Result<Vec<String>, AppError> {
        let tokens = sqlx::query_scalar::<_, String>("SELECT token FROM tokens")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list tokens: {}", e))
            })?;

        Ok(tokens)
    }

    // -------------------------------------------------------------------------
    // Hourly Temperature Log
    // -------------------------------------------------------------------------

    /// Overwrite one hour slot; the other 23 are untouched. Concurrent writes
    /// to the same hour race last-writer-wins.
    #[instrument(skip(self))]
    pub async fn write_hour_slot(&self, hour: u8, slot: TemperatureSlot) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO temperature_log (hour, avg_temperature, adj_temperature) \
             VALUES (?, ?, ?) \
             ON CONFLICT(hour) DO UPDATE SET \
                 avg_temperature = excluded.avg_temperature, \
                 adj_temperature = excluded.adj_temperature",
        )
        .bind(i64::from(hour))
        .bind(slot.avg_temperature)
        .bind(slot.adj_temperature)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to write hour slot {}: {}", hour, e))
        })?;

        Ok(())
    }

    /// Materialize the full 24-slot log. Hours never written read as zero.
    #[instrument(skip(self))]
    pub async fn hourly_log(&self) -> Result<HourlyTemperatureLog, AppError> {
        let rows: Vec<(i64, f64, f64)> =
            sqlx::query_as("SELECT hour, avg_temperature, adj_temperature FROM temperature_log")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to read temperature log: {}",
                        e
                    ))
                })?;

        let mut log = [TemperatureSlot::default(); HOURS_PER_DAY];
        for (hour, avg, adj) in rows {
            if let Some(slot) = log.get_mut(hour as usize) {
                *slot = TemperatureSlot {
                    avg_temperature: avg,
                    adj_temperature: adj,
                };
            }
        }

        Ok(log)
    }
}
