use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::{config::app_config::AppConfig, models::error::ServerError};

pub(crate) trait Database {
    type Session: Session;

    async fn open(&self, dsn: &str) -> Result<Self::Session, ServerError>;
}

pub(crate) trait Session {
    async fn ping(&mut self) -> Result<(), ServerError>;

    /// Consumes the session. Called exactly once per opened session.
    async fn close(self) -> Result<(), ServerError>;
}

#[derive(Debug)]
pub struct ConnectivityReport {
    pub elapsed: Duration,
}

/// Opens a session, pings it and closes it again.
///
/// The session is closed whether or not the ping succeeded. A ping error wins
/// over a close error; the latter is only logged in that case.
pub async fn check_connectivity<D>(db: &D, dsn: &str) -> Result<ConnectivityReport, ServerError>
where
    D: Database,
{
    let started = Instant::now();
    let mut session = db.open(dsn).await?;
    debug!("Connection opened, sending ping");

    let ping = session.ping().await;
    let close = session.close().await;

    match (ping, close) {
        (Ok(()), Ok(())) => {}
        (Ok(()), Err(e)) => return Err(e),
        (Err(e), Ok(())) => return Err(e),
        (Err(e), Err(close_err)) => {
            warn!("Failed to close connection after failed ping: {}", close_err);
            return Err(e);
        }
    }

    let report = ConnectivityReport {
        elapsed: started.elapsed(),
    };

    info!("Successfully connected! ({} ms)", report.elapsed.as_millis());
    Ok(report)
}

pub async fn run_check<D>(db: &D, config: &AppConfig) -> Result<ConnectivityReport, ServerError>
where
    D: Database,
{
    tokio::time::timeout(config.timeout(), check_connectivity(db, &config.dsn))
        .await
        .map_err(|_| ServerError::Timeout(config.connect_timeout))?
}
