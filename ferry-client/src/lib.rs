//! # ferry-client
//!
//! Client library for the ferry file-exchange protocol.
//!
//! This crate provides:
//! - TCP connection establishment
//! - The per-command exchange engine (LS, GET, PUT, RM)
//! - Typed exchange outcomes and the client error taxonomy
//!
//! Exchanges are strictly sequential: one request is outstanding at a
//! time and every send and receive is awaited to completion with no
//! timeout, so a stalled peer stalls the session.

pub mod connection;
pub mod error;
pub mod session;

pub use connection::{connect, ConnectionConfig};
pub use error::ClientError;
pub use session::{GetOutcome, PutOutcome, ReplyStatus, Session};
