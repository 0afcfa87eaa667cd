//! Startup check that the recipe schema is present and fully migrated

use std::collections::HashSet;

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

/// Tables the recipe services read and write
pub const RECIPE_TABLES: &[&str] = &[
    "ingredients",
    "recipe_instructions",
    "recipes",
    "recipe_categories",
    "recipe_category_links",
    "recipe_ingredients",
];

#[derive(Debug, Error)]
pub enum DatabaseValidationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("schema incomplete: {0}")]
    SchemaIncomplete(String),
}

pub struct DatabaseValidator {
    pool: SqlitePool,
}

impl DatabaseValidator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Compare applied migrations with the embedded set and look for the recipe tables.
    pub async fn validate(&self) -> Result<ValidationResult, DatabaseValidationError> {
        let tracked = self.table_exists("_sqlx_migrations").await?;
        if !tracked {
            warn!("No _sqlx_migrations table, schema has never been migrated");
            return Ok(ValidationResult {
                is_initialized: false,
                migrations_applied: 0,
                pending_migrations: db::MIGRATOR
                    .iter()
                    .map(|m| m.description.to_string())
                    .collect(),
                missing_tables: RECIPE_TABLES.iter().map(|t| t.to_string()).collect(),
            });
        }

        let applied: HashSet<i64> =
            sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success = 1")
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .collect();

        let pending_migrations: Vec<String> = db::MIGRATOR
            .iter()
            .filter(|m| !applied.contains(&m.version))
            .map(|m| format!("{}_{}", m.version, m.description))
            .collect();

        let missing_tables = self.missing_tables(RECIPE_TABLES).await?;

        let result = ValidationResult {
            is_initialized: true,
            migrations_applied: applied.len(),
            pending_migrations,
            missing_tables,
        };
        if result.is_ok() {
            info!(migrations_applied = result.migrations_applied, "Database schema validated");
        } else {
            warn!(summary = %result.summary(), "Database schema validation found problems");
        }
        Ok(result)
    }

    /// Like [`validate`](Self::validate) but turns any problem into an error.
    pub async fn ensure_valid(&self) -> Result<ValidationResult, DatabaseValidationError> {
        let result = self.validate().await?;
        if result.is_ok() {
            Ok(result)
        } else {
            Err(DatabaseValidationError::SchemaIncomplete(result.summary()))
        }
    }

    pub async fn missing_tables(
        &self,
        required_tables: &[&str],
    ) -> Result<Vec<String>, DatabaseValidationError> {
        let mut missing = Vec::new();
        for table in required_tables {
            if !self.table_exists(table).await? {
                missing.push(table.to_string());
            }
        }
        Ok(missing)
    }

    async fn table_exists(&self, table: &str) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_initialized: bool,
    pub migrations_applied: usize,
    pub pending_migrations: Vec<String>,
    pub missing_tables: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.is_initialized && self.pending_migrations.is_empty() && self.missing_tables.is_empty()
    }

    pub fn summary(&self) -> String {
        if !self.is_initialized {
            return "database not initialized, migrations need to be run".to_string();
        }
        let mut problems = Vec::new();
        if !self.pending_migrations.is_empty() {
            problems.push(format!("pending migrations: {}", self.pending_migrations.join(", ")));
        }
        if !self.missing_tables.is_empty() {
            problems.push(format!("missing tables: {}", self.missing_tables.join(", ")));
        }
        if problems.is_empty() {
            format!("{} migrations applied", self.migrations_applied)
        } else {
            problems.join("; ")
        }
    }
}
