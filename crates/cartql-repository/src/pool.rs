//! MySQL connection pool for attribute lookups.

use async_trait::async_trait;
use cartql_config::DatabaseConfig;
use cartql_core::{CartqlError, CartqlResult, Interface};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Pool seam the repositories depend on.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// Returns the underlying MySQL pool.
    fn inner(&self) -> &MySqlPool;

    /// Round-trips a trivial statement.
    async fn health_check(&self) -> CartqlResult<()>;

    /// Closes every connection of the pool.
    async fn close(&self);
}

/// Pool owned by the host for the lifetime of the process.
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Opens a pool sized and timed by `config`.
    pub async fn connect(config: &DatabaseConfig) -> CartqlResult<Self> {
        let options = connect_options(config)?;
        info!(
            max_connections = config.max_connections,
            "Connecting to attribute storage"
        );

        let pool = pool_options(config)
            .connect_with(options)
            .await
            .map_err(|e| {
                warn!("Failed to connect to attribute storage: {}", e);
                CartqlError::Database(format!("Failed to connect: {}", e))
            })?;

        info!("Attribute storage pool established");
        Ok(Self { pool })
    }

    /// Wraps a pool built elsewhere.
    #[must_use]
    pub fn with_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    async fn health_check(&self) -> CartqlResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| CartqlError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Attribute storage pool closed");
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Parses the URL and applies statement logging.
fn connect_options(config: &DatabaseConfig) -> CartqlResult<MySqlConnectOptions> {
    let options = MySqlConnectOptions::from_str(&config.url)
        .map_err(|e| CartqlError::configuration(format!("Invalid database URL: {}", e)))?;

    if config.log_queries {
        Ok(options)
    } else {
        Ok(options.disable_statement_logging())
    }
}

fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout())
        .idle_timeout(Some(config.idle_timeout()))
}

/// Opens a pool and shares it.
pub async fn create_pool(config: &DatabaseConfig) -> CartqlResult<Arc<DatabasePool>> {
    Ok(Arc::new(DatabasePool::connect(config).await?))
}
