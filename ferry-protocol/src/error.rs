//! Protocol error types.

use thiserror::Error;

/// Errors raised while decoding a header off the wire.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown command byte: {0:#04x}")]
    UnknownCommand(u8),
}
