use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::DatabaseError;

pub const DATABASE_URL_ENV: &str = "LUPUS_DATABASE_URL";
pub const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub connect_retries: usize,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_size: 5,
            connect_retries: 3,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MEMORY_URL)
    }

    pub fn from_cli_or_env_or_yaml(cli_arg: Option<String>, yaml_config: Option<String>) -> Self {
        let url = if let Some(arg) = cli_arg {
            arg
        } else if let Ok(env) = std::env::var(DATABASE_URL_ENV) {
            env
        } else if let Some(yaml) = yaml_config {
            yaml
        } else {
            MEMORY_URL.to_string()
        };

        Self::new(url)
    }

    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    pub fn connect_options(&self) -> Result<SqliteConnectOptions, DatabaseError> {
        SqliteConnectOptions::from_str(&self.url)
            .map(|options| options.create_if_missing(true))
            .map_err(|e| DatabaseError::Connection(e.to_string()))
    }

    /// Opens a pool for this url. An in-memory database lives and dies with
    /// its connection, so memory pools hold exactly one connection forever.
    pub async fn create_pool(&self) -> Result<SqlitePool, DatabaseError> {
        let options = self.connect_options()?;
        let pool_options = if self.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(self.pool_size)
        };
        pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))
    }
}
