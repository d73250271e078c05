//! Server configuration from CLI flags, environment and `.env`.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use intake_postgres::PgStoreConfig;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "intake_server",
    about = "Onboarding intake API: accepts form submissions and serves campaign context"
)]
pub struct ServerConfig {
    /// Listen address.
    #[arg(long, env = "INTAKE_BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: SocketAddr,

    /// Full connection string; takes precedence over the POSTGRES_* parts.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "POSTGRES_HOST", default_value = "localhost")]
    pub postgres_host: String,

    #[arg(long, env = "POSTGRES_PORT", default_value_t = 5432)]
    pub postgres_port: u16,

    #[arg(long, env = "POSTGRES_DB", default_value = "postgres")]
    pub postgres_db: String,

    #[arg(long, env = "POSTGRES_USER", default_value = "postgres")]
    pub postgres_user: String,

    #[arg(long, env = "POSTGRES_PASSWORD", default_value = "", hide_env_values = true)]
    pub postgres_password: String,

    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 10)]
    pub pool_size: u32,

    /// How long a request may wait for a pooled connection.
    #[arg(long, env = "INTAKE_ACQUIRE_TIMEOUT_MS", default_value_t = 3_000)]
    pub acquire_timeout_ms: u64,

    /// Upper bound on any single store call made by a request.
    #[arg(long, env = "INTAKE_STORE_TIMEOUT_MS", default_value_t = 5_000)]
    pub store_timeout_ms: u64,

    #[arg(long, env = "INTAKE_MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => format!(
                "postgresql://{}:{}@{}:{}/{}",
                self.postgres_user,
                self.postgres_password,
                self.postgres_host,
                self.postgres_port,
                self.postgres_db
            ),
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn pg_store_config(&self) -> PgStoreConfig {
        PgStoreConfig {
            database_url: self.database_url(),
            max_connections: self.pool_size,
            acquire_timeout: Duration::from_millis(self.acquire_timeout_ms),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["intake_server"];
        argv.extend_from_slice(args);
        ServerConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn url_is_assembled_from_parts() {
        let cfg = parse(&[
            "--database-url",
            "",
            "--postgres-host",
            "db",
            "--postgres-port",
            "5432",
            "--postgres-user",
            "intake",
            "--postgres-password",
            "pw",
            "--postgres-db",
            "onboarding",
        ]);
        assert_eq!(cfg.database_url(), "postgresql://intake:pw@db:5432/onboarding");
    }

    #[test]
    fn explicit_url_wins() {
        let cfg = parse(&["--database-url", "postgresql:///intake"]);
        assert_eq!(cfg.database_url(), "postgresql:///intake");
    }

    #[test]
    fn timeouts_flow_into_store_config() {
        let cfg = parse(&[
            "--database-url",
            "postgresql:///intake",
            "--acquire-timeout-ms",
            "750",
            "--pool-size",
            "4",
        ]);
        let pg = cfg.pg_store_config();
        assert_eq!(pg.acquire_timeout, Duration::from_millis(750));
        assert_eq!(pg.max_connections, 4);
        assert_eq!(cfg.store_timeout(), Duration::from_secs(5));
    }
}
