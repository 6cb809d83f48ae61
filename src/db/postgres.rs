use std::str::FromStr;

use sqlx::{
    ConnectOptions, Connection, PgConnection,
    postgres::{PgConnectOptions, PgSslMode},
};

use crate::{
    models::error::ServerError,
    service::connectivity::{Database, Session},
};

#[derive(Debug)]
pub struct PgDatabase;

pub struct PgSession {
    conn: PgConnection,
}

impl Database for PgDatabase {
    type Session = PgSession;

    async fn open(&self, dsn: &str) -> Result<PgSession, ServerError> {
        let options = connect_options(dsn)?;
        let conn = options.connect().await?;
        Ok(PgSession { conn })
    }
}

impl Session for PgSession {
    async fn ping(&mut self) -> Result<(), ServerError> {
        self.conn.ping().await?;
        Ok(())
    }

    async fn close(self) -> Result<(), ServerError> {
        self.conn.close().await?;
        Ok(())
    }
}

/// Accepts both `postgres://` URLs and libpq style `key=value` strings.
pub fn connect_options(dsn: &str) -> Result<PgConnectOptions, ServerError> {
    let dsn = dsn.trim();
    if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
        return Ok(PgConnectOptions::from_str(dsn)?);
    }

    let mut options = PgConnectOptions::new();
    for (key, value) in parse_key_values(dsn)? {
        options = match key.as_str() {
            "host" | "hostaddr" => options.host(&value),
            "port" => {
                let port = value
                    .parse::<u16>()
                    .map_err(|_| ServerError::InvalidConfig(format!("invalid port: {}", value)))?;
                options.port(port)
            }
            "user" => options.username(&value),
            "password" => options.password(&value),
            "dbname" => options.database(&value),
            "sslmode" => options.ssl_mode(PgSslMode::from_str(&value)?),
            "sslrootcert" => options.ssl_root_cert(value.as_str()),
            "application_name" => options.application_name(&value),
            // Bounded by POSTGRESQLAPP_CONNECT_TIMEOUT instead.
            "connect_timeout" => options,
            _ => {
                return Err(ServerError::InvalidConfig(format!(
                    "unsupported DSN key: {}",
                    key
                )));
            }
        };
    }

    Ok(options)
}

fn parse_key_values(dsn: &str) -> Result<Vec<(String, String)>, ServerError> {
    let mut pairs = Vec::new();
    let mut chars = dsn.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next() != Some('=') {
            return Err(ServerError::InvalidConfig(format!(
                "missing \"=\" after \"{}\" in DSN",
                key
            )));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'\'').is_some() {
            loop {
                match chars.next() {
                    Some('\'') => break,
                    Some('\\') => match chars.next() {
                        Some(c) => value.push(c),
                        None => break,
                    },
                    Some(c) => value.push(c),
                    None => {
                        return Err(ServerError::InvalidConfig(
                            "unterminated quoted value in DSN".into(),
                        ));
                    }
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                } else {
                    value.push(c);
                }
            }
        }

        pairs.push((key, value));
    }

    Ok(pairs)
}
