use std::sync::Arc;

use async_trait::async_trait;
use db::DBService;
use services::services::database_validator::{DatabaseValidationError, DatabaseValidator};
use thiserror::Error;
use tracing::info;

pub mod config;

pub use config::{Config, ConfigError};

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    DatabaseValidation(#[from] DatabaseValidationError),
}

#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new() -> Result<Self, DeploymentError>;

    fn db(&self) -> &DBService;

    fn config(&self) -> &Config;
}

/// Single-process deployment: one SQLite pool and the config it was opened with.
#[derive(Clone)]
pub struct LocalDeployment {
    db: DBService,
    config: Arc<Config>,
}

impl LocalDeployment {
    pub fn from_parts(db: DBService, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub async fn from_config(config: Config) -> Result<Self, DeploymentError> {
        let db = DBService::new(&config.database_url, config.db_max_connections).await?;

        let validation = DatabaseValidator::new(db.pool.clone()).ensure_valid().await?;
        info!(
            migrations_applied = validation.migrations_applied,
            "Local deployment ready"
        );

        Ok(Self::from_parts(db, config))
    }
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new() -> Result<Self, DeploymentError> {
        let config = Config::load()?;
        Self::from_config(config).await
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn config(&self) -> &Config {
        &self.config
    }
}
