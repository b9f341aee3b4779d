//! Client error types.

use ferry_protocol::{CommandCode, Header, ProtocolError};
use std::path::PathBuf;
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("expected {expected} reply, server returned {reply}")]
    Mismatch {
        expected: CommandCode,
        reply: Header,
    },

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: file too large for a single transfer", .path.display())]
    TooLarge { path: PathBuf },
}

impl ClientError {
    /// Returns whether this error ends the session.
    ///
    /// Transport-level failures (and a reply stream we can no longer
    /// trust) are fatal; protocol mismatches and local file errors abort
    /// only the current command.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_)
                | ClientError::Protocol(_)
                | ClientError::ConnectionClosed
                | ClientError::ConnectTimeout
        )
    }
}
