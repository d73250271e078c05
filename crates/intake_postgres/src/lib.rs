//! PostgreSQL adapter for the onboarding intake core.
//!
//! Provides pool configuration, the `OnboardingStore` implementation
//! (which owns the pool), and the idempotent schema used by tests and
//! local setups.

use std::time::Duration;

use sqlx::PgPool;

use intake_core::IntakeError;

mod error;
mod sqlx_types;
pub mod store;

pub use store::PgOnboardingStore;

/// Tables and the `client_campaign_context` view.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

/// Database pool configuration
#[derive(Debug, Clone)]
pub struct PgStoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for PgStoreConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://postgres@localhost:5432/postgres".to_string(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Some(Duration::from_secs(600)), // 10 minutes
            max_lifetime: Some(Duration::from_secs(1800)), // 30 minutes
        }
    }
}

/// Apply [`SCHEMA_SQL`]. Every statement is idempotent.
pub async fn install_schema(pool: &PgPool) -> Result<(), IntakeError> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(error::classify)?;
    Ok(())
}

/// Mask the password of a connection string for logging.
pub fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut masked = parsed.clone();
        if parsed.password().is_some() {
            let _ = masked.set_password(Some("***"));
        }
        masked.to_string()
    } else if url.chars().count() > 20 {
        let head: String = url.chars().take(10).collect();
        let tail: String = url.chars().skip(url.chars().count() - 10).collect();
        format!("{head}***{tail}")
    } else {
        "***".to_string()
    }
}
