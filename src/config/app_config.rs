use std::{collections::HashMap, path::Path, time::Duration};

use config::{Config, Environment};
use serde::Deserialize;
use tracing::debug;

use crate::models::error::ServerError;

pub const ENV_PREFIX: &str = "POSTGRESQLAPP";

fn default_connect_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub dsn: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

pub const ENV_FILE: &str = ".env";

/// Loads `.env` from the working directory into the process environment.
pub fn load_env_file() -> Result<(), ServerError> {
    load_env_file_in(Path::new("."))
}

/// Loads `dir/.env`. Parent directories are not searched and variables
/// already present in the environment are left untouched.
pub fn load_env_file_in(dir: &Path) -> Result<(), ServerError> {
    let path = dir.join(ENV_FILE);
    dotenvy::from_path(&path)?;
    debug!("Loaded env file: {}", path.display());
    Ok(())
}

impl AppConfig {
    pub fn load() -> Result<Self, ServerError> {
        Self::load_from(None)
    }

    /// Reads `POSTGRESQLAPP_*` keys from `source`, or the process environment when `None`.
    pub fn load_from(source: Option<HashMap<String, String>>) -> Result<Self, ServerError> {
        let config: AppConfig = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(source),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!("Loaded config with connect timeout {}s", config.connect_timeout);

        Ok(config)
    }

    fn validate(&self) -> Result<(), ServerError> {
        if self.dsn.trim().is_empty() {
            return Err(ServerError::MissingDsn);
        }

        if self.connect_timeout == 0 {
            return Err(ServerError::InvalidConfig(
                "connect_timeout must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}
