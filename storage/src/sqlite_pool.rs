//! SQLite connection pool wrapper for the storage crate.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

fn is_memory_url(database_url: &str) -> bool {
    matches!(database_url.trim(), ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

/// File path of a `sqlite:` URL or plain path.
fn file_path(database_url: &str) -> &str {
    let url = database_url.trim();
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

/// Manages a single SQLite pool; creates the DB file (and its directory) if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for a file path, a `sqlite:` URL or an in-memory database.
    ///
    /// An in-memory database lives as long as its connection, so its pool holds exactly one that never expires.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url, "Initializing SQLite pool");

        let pool = if is_memory_url(database_url) {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            let path = file_path(database_url);
            if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true);
            SqlitePool::connect_with(options).await?
        };

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_forms() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url(":memory:"));
        assert!(!is_memory_url("data/restdel.db"));
        assert_eq!(file_path("sqlite://data/restdel.db"), "data/restdel.db");
        assert_eq!(file_path("sqlite:restdel.db"), "restdel.db");
        assert_eq!(file_path("data/restdel.db"), "data/restdel.db");
    }
}
