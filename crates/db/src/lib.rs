use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::{info, warn};

pub mod models;

/// Migrations embedded at compile time from `crates/db/migrations`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Shared handle to the recipe database
#[derive(Clone)]
pub struct DBService {
    pub pool: SqlitePool,
}

impl DBService {
    /// Connect to `database_url`, creating the file if needed, and apply migrations.
    ///
    /// An in-memory URL is opened on a single connection whatever `max_connections` says.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<DBService, sqlx::Error> {
        if is_in_memory(database_url) {
            if max_connections > 1 {
                warn!(
                    database_url,
                    max_connections, "In-memory database, pool limited to one connection"
                );
            }
            let options = SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);
            return Self::single_connection(options).await;
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        info!(database_url, max_connections, "Database ready");

        Ok(DBService { pool })
    }

    /// Single-connection in-memory database. Every connection to `sqlite::memory:`
    /// is its own database, so the pool must never replace its connection.
    pub async fn new_in_memory() -> Result<DBService, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        Self::single_connection(options).await
    }

    async fn single_connection(options: SqliteConnectOptions) -> Result<DBService, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;

        Ok(DBService { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        MIGRATOR
            .run(pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
