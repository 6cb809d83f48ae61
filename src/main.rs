use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::app_config::{AppConfig, load_env_file},
    db::postgres::PgDatabase,
    models::error::ServerError,
    service::connectivity::{ConnectivityReport, run_check},
};

mod config;
mod db;
mod models;
mod service;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match connect().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn connect() -> Result<ConnectivityReport, ServerError> {
    load_env_file()?;
    let config = AppConfig::load()?;
    run_check(&PgDatabase, &config).await
}
