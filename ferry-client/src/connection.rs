//! Connection establishment.

use crate::error::ClientError;
use crate::session::Session;
use std::time::Duration;
use tokio::net::TcpStream;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Connection timeout. Established exchanges have none.
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// The endpoint in `host:port` form, for log lines.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Opens a TCP connection to the server and wraps it in a session.
///
/// The session owns the connection for its entire lifetime; there is no
/// reconnection.
pub async fn connect(config: &ConnectionConfig) -> Result<Session<TcpStream>, ClientError> {
    tracing::debug!("connecting to {}...", config.endpoint());

    let stream = tokio::time::timeout(
        config.connect_timeout,
        TcpStream::connect((config.host.as_str(), config.port)),
    )
    .await
    .map_err(|_| ClientError::ConnectTimeout)?
    .map_err(ClientError::Transport)?;

    stream.set_nodelay(true).ok();
    tracing::debug!("connected to {}", config.endpoint());

    Ok(Session::new(stream))
}
