use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Error loading .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("POSTGRESQLAPP_DSN is not set")]
    MissingDsn,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Sqlx failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}
