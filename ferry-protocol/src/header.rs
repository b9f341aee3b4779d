//! Fixed binary header for ferry exchanges.
//!
//! Header layout (64 bytes, followed by `nbytes` raw payload bytes
//! whenever `nbytes > 0`):
//!
//! ```text
//! +---------+---------+----------------------+
//! | command | nbytes  | filename             |
//! | 1 byte  | 4 bytes | 59 bytes             |
//! +---------+---------+----------------------+
//! ```
//!
//! `nbytes` is big-endian. The header carries no magic and no version
//! field; field widths and ordering are agreed out of band.

use crate::error::ProtocolError;
use bytes::{Buf, BufMut, BytesMut};
use std::fmt;

/// Size of the fixed header in bytes (1 + 4 + 59).
pub const HEADER_SIZE: usize = 64;

/// Capacity of the filename field in bytes.
pub const FILENAME_CAPACITY: usize = 59;

/// Protocol command codes.
///
/// Discriminants are the wire encoding and must remain stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandCode {
    Error = 0,
    Exit = 1,
    Help = 2,
    Ls = 3,
    Get = 4,
    Put = 5,
    Rm = 6,
    Lsout = 7,
    Fileout = 8,
    Ack = 9,
    Nak = 10,
}

impl CommandCode {
    /// Returns whether this code may appear in a client request.
    pub fn is_client_issued(&self) -> bool {
        matches!(
            self,
            CommandCode::Exit
                | CommandCode::Help
                | CommandCode::Ls
                | CommandCode::Get
                | CommandCode::Put
                | CommandCode::Rm
        )
    }

    /// Returns whether this code may appear in a server reply.
    pub fn is_server_issued(&self) -> bool {
        matches!(
            self,
            CommandCode::Lsout
                | CommandCode::Fileout
                | CommandCode::Ack
                | CommandCode::Nak
                | CommandCode::Error
        )
    }
}

impl TryFrom<u8> for CommandCode {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            0 => Ok(CommandCode::Error),
            1 => Ok(CommandCode::Exit),
            2 => Ok(CommandCode::Help),
            3 => Ok(CommandCode::Ls),
            4 => Ok(CommandCode::Get),
            5 => Ok(CommandCode::Put),
            6 => Ok(CommandCode::Rm),
            7 => Ok(CommandCode::Lsout),
            8 => Ok(CommandCode::Fileout),
            9 => Ok(CommandCode::Ack),
            10 => Ok(CommandCode::Nak),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandCode::Error => "ERROR",
            CommandCode::Exit => "EXIT",
            CommandCode::Help => "HELP",
            CommandCode::Ls => "LS",
            CommandCode::Get => "GET",
            CommandCode::Put => "PUT",
            CommandCode::Rm => "RM",
            CommandCode::Lsout => "LSOUT",
            CommandCode::Fileout => "FILEOUT",
            CommandCode::Ack => "ACK",
            CommandCode::Nak => "NAK",
        };
        f.write_str(name)
    }
}

/// A bounded filename buffer with an explicit length.
///
/// Names longer than [`FILENAME_CAPACITY`] are truncated, not rejected,
/// and a name that exactly fills the buffer carries no NUL terminator.
/// On decode the name ends at the first NUL byte or at capacity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Filename {
    bytes: [u8; FILENAME_CAPACITY],
    len: usize,
}

impl Filename {
    /// Builds a filename from raw bytes, truncating at capacity.
    pub fn new(name: &[u8]) -> Self {
        let len = name.len().min(FILENAME_CAPACITY);
        let mut bytes = [0u8; FILENAME_CAPACITY];
        bytes[..len].copy_from_slice(&name[..len]);
        Self { bytes, len }
    }

    /// Reconstructs a filename from the wire field, ending the name at
    /// the first NUL byte or at capacity. Bytes past the terminator are
    /// discarded so equality only considers the name itself.
    fn from_wire(field: &[u8; FILENAME_CAPACITY]) -> Self {
        let len = field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FILENAME_CAPACITY);
        Self::new(&field[..len])
    }

    /// The name as raw bytes, without padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The zero-padded wire form of the field.
    fn to_wire(self) -> [u8; FILENAME_CAPACITY] {
        self.bytes
    }
}

impl From<&str> for Filename {
    fn from(name: &str) -> Self {
        Self::new(name.as_bytes())
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Debug for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filename({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// The fixed control record preceding every exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Command or reply code.
    pub command: CommandCode,
    /// Length of the payload that follows, zero when none does.
    pub nbytes: u32,
    /// Name the command operates on, empty when not applicable.
    pub filename: Filename,
}

impl Header {
    /// Builds a request header with `nbytes` defaulted to zero.
    pub fn request(command: CommandCode, filename: &str) -> Self {
        Self {
            command,
            nbytes: 0,
            filename: Filename::from(filename),
        }
    }

    pub fn with_nbytes(mut self, nbytes: u32) -> Self {
        self.nbytes = nbytes;
        self
    }

    /// Encodes the header into its fixed 64-byte wire form.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE);
        buf.put_u8(self.command as u8);
        buf.put_u32(self.nbytes);
        buf.put_slice(&self.filename.to_wire());
        buf
    }

    /// Decodes a header from a fixed 64-byte record.
    pub fn from_bytes(raw: &[u8; HEADER_SIZE]) -> Result<Self, ProtocolError> {
        let command = CommandCode::try_from(raw[0])?;
        let nbytes = u32::from_be_bytes([raw[1], raw[2], raw[3], raw[4]]);
        let mut field = [0u8; FILENAME_CAPACITY];
        field.copy_from_slice(&raw[5..]);
        Ok(Self {
            command,
            nbytes,
            filename: Filename::from_wire(&field),
        })
    }

    /// Decodes a header from the front of a buffer.
    ///
    /// Returns `Ok(Some(header))` if a complete header was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on an unknown
    /// command byte (the buffer is left unconsumed in that case).
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        if buf.len() < HEADER_SIZE {
            return Ok(None);
        }
        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&buf[..HEADER_SIZE]);
        let header = Self::from_bytes(&raw)?;
        buf.advance(HEADER_SIZE);
        Ok(Some(header))
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nbytes={} filename=\"{}\"",
            self.command, self.nbytes, self.filename
        )
    }
}
