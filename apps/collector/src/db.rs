use std::collections::HashSet;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use tracing::info;

use crate::errors::AppError;

/// `(data_source_code, lowercased reference)` pairs already tracked by the
/// aggregator. Loaded once before reconciliation; read-only afterwards.
pub type ExistingSet = HashSet<(String, String)>;

/// Creates and returns a MySQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<MySqlPool, AppError> {
    info!("Connecting to MySQL...");

    let pool = MySqlPoolOptions::new()
        .max_connections(4)
        .connect(database_url)
        .await?;

    info!("MySQL connection pool established");
    Ok(pool)
}

/// Loads the set of companies already present in `job_data_source_company`.
/// References are lowercased here so membership checks are case-insensitive.
pub async fn load_existing_companies(pool: &MySqlPool) -> Result<ExistingSet, AppError> {
    let rows = sqlx::query("SELECT data_source_code, reference FROM job_data_source_company")
        .fetch_all(pool)
        .await?;

    let mut existing = ExistingSet::new();
    for row in rows {
        let source_code: String = row.try_get("data_source_code")?;
        let reference: Option<String> = row.try_get("reference")?;
        existing.insert((source_code, reference.unwrap_or_default().to_lowercase()));
    }

    info!(entries = existing.len(), "Existing companies loaded");
    Ok(existing)
}
