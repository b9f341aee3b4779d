//! Per-command exchange sequencing.
//!
//! Every command sends a request header and reads a reply header, with
//! PUT additionally sending a payload before the reply and LS/GET
//! receiving one after it. Exactly one request is outstanding at a
//! time; each exchange is fully awaited before control returns to the
//! caller, with no timeout and no cancellation path.

use crate::error::ClientError;
use ferry_protocol::{CommandCode, Header, HEADER_SIZE};
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Result of a GET exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetOutcome {
    /// The reply announced zero bytes; an empty local file was created.
    Empty,
    /// The payload was received and written verbatim to the local file.
    Written(usize),
    /// The server replied with something other than FILEOUT.
    Refused(CommandCode),
}

/// Server acknowledgement for mutating commands (PUT, RM).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    /// Positive acknowledgement.
    Acked,
    /// Negative acknowledgement.
    Nacked,
    /// Any other reply code; ignored without output.
    Ignored(CommandCode),
}

impl ReplyStatus {
    fn from_reply(code: CommandCode) -> Self {
        match code {
            CommandCode::Ack => ReplyStatus::Acked,
            CommandCode::Nak => ReplyStatus::Nacked,
            other => ReplyStatus::Ignored(other),
        }
    }
}

/// Result of a PUT exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The local file does not exist; nothing was transmitted.
    Missing,
    /// The local file is zero bytes long; nothing was transmitted.
    ZeroByte,
    /// The file was transmitted; carries the byte count and the reply.
    Sent { nbytes: u32, status: ReplyStatus },
}

/// A protocol session over one transport connection.
///
/// A header is freshly constructed per command and never reused across
/// requests; payload buffers are sized per transfer and released when
/// the command returns. Only the session itself persists.
pub struct Session<S> {
    stream: S,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Consumes the session, returning the underlying transport.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Lists the names of files on the server.
    ///
    /// Expects an LSOUT reply followed by the newline-separated name
    /// list; any other reply code aborts the command with a mismatch
    /// error.
    pub async fn ls(&mut self) -> Result<String, ClientError> {
        self.send_header(&Header::request(CommandCode::Ls, "")).await?;
        let reply = self.recv_header().await?;
        if reply.command != CommandCode::Lsout {
            return Err(ClientError::Mismatch {
                expected: CommandCode::Lsout,
                reply,
            });
        }
        let payload = self.recv_payload(reply.nbytes).await?;
        Ok(String::from_utf8_lossy(&payload).into_owned())
    }

    /// Fetches a remote file, writing it to the local file `name`.
    ///
    /// A reply announcing zero bytes creates an empty local file
    /// whatever its command code; a FILEOUT reply is followed by the
    /// payload, written verbatim; any other reply refuses the transfer
    /// and nothing is written.
    pub async fn get(&mut self, name: &str) -> Result<GetOutcome, ClientError> {
        self.send_header(&Header::request(CommandCode::Get, name)).await?;
        let reply = self.recv_header().await?;

        if reply.nbytes == 0 {
            write_file(name, &[]).await?;
            return Ok(GetOutcome::Empty);
        }
        if reply.command != CommandCode::Fileout {
            return Ok(GetOutcome::Refused(reply.command));
        }

        let payload = self.recv_payload(reply.nbytes).await?;
        write_file(name, &payload).await?;
        Ok(GetOutcome::Written(payload.len()))
    }

    /// Uploads the local file `name` to the server.
    ///
    /// A missing file or a zero-byte file transmits nothing at all; the
    /// zero-byte no-op is kept for compatibility with deployed servers
    /// and leaves the server's state for that name untouched. Otherwise
    /// the header announces the file length and the full content follows
    /// before the acknowledgement is read.
    pub async fn put(&mut self, name: &str) -> Result<PutOutcome, ClientError> {
        let contents = match fs::read(name).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PutOutcome::Missing)
            }
            Err(source) => {
                return Err(ClientError::File {
                    path: Path::new(name).to_path_buf(),
                    source,
                })
            }
        };
        if contents.is_empty() {
            return Ok(PutOutcome::ZeroByte);
        }
        let nbytes = u32::try_from(contents.len()).map_err(|_| ClientError::TooLarge {
            path: Path::new(name).to_path_buf(),
        })?;

        let header = Header::request(CommandCode::Put, name).with_nbytes(nbytes);
        self.send_header(&header).await?;
        self.stream.write_all(&contents).await?;
        tracing::debug!("sent {} payload bytes", nbytes);

        let reply = self.recv_header().await?;
        Ok(PutOutcome::Sent {
            nbytes,
            status: ReplyStatus::from_reply(reply.command),
        })
    }

    /// Removes a remote file.
    pub async fn rm(&mut self, name: &str) -> Result<ReplyStatus, ClientError> {
        self.send_header(&Header::request(CommandCode::Rm, name)).await?;
        let reply = self.recv_header().await?;
        Ok(ReplyStatus::from_reply(reply.command))
    }

    async fn send_header(&mut self, header: &Header) -> Result<(), ClientError> {
        tracing::debug!("sending header {}", header);
        self.stream.write_all(&header.encode()).await?;
        Ok(())
    }

    async fn recv_header(&mut self) -> Result<Header, ClientError> {
        let mut raw = [0u8; HEADER_SIZE];
        self.stream.read_exact(&mut raw).await.map_err(map_eof)?;
        let header = Header::from_bytes(&raw)?;
        tracing::debug!("received header {}", header);
        Ok(header)
    }

    async fn recv_payload(&mut self, nbytes: u32) -> Result<Vec<u8>, ClientError> {
        let mut payload = vec![0u8; nbytes as usize];
        self.stream.read_exact(&mut payload).await.map_err(map_eof)?;
        tracing::debug!("received {} payload bytes", nbytes);
        Ok(payload)
    }
}

async fn write_file(path: &str, contents: &[u8]) -> Result<(), ClientError> {
    fs::write(path, contents).await.map_err(|source| ClientError::File {
        path: Path::new(path).to_path_buf(),
        source,
    })
}

fn map_eof(err: std::io::Error) -> ClientError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        ClientError::ConnectionClosed
    } else {
        ClientError::Transport(err)
    }
}
