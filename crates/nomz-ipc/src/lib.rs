//! nomz IPC
//!
//! Minimal client for the i3/sway IPC socket: socket discovery, message
//! framing, the layout tree model and window events. Only the pieces the
//! swallowing daemon needs are modelled.

mod connection;
mod error;
mod event;
mod tree;

pub use connection::{Connection, EventStream};
pub use error::{IpcError, Result};
pub use event::{WindowChange, WindowEvent};
pub use tree::{CommandOutcome, Node, Rect, WindowProperties};

use std::path::PathBuf;

/// Magic string opening every i3-ipc message
pub const MAGIC: &[u8; 6] = b"i3-ipc";

/// Length of the fixed message header (magic + payload length + type)
pub const HEADER_LEN: usize = MAGIC.len() + 8;

/// Bit set on the message type of asynchronous events
pub const EVENT_MASK: u32 = 1 << 31;

/// Locate the window manager socket.
///
/// `SWAYSOCK` wins over `I3SOCK`; both are exported into the session by the
/// respective window manager.
pub fn socket_path() -> Result<PathBuf> {
    ["SWAYSOCK", "I3SOCK"]
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or(IpcError::NoSocket)
}

// ============================================================================
// Message types
// ============================================================================

/// Requests understood by the window manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    RunCommand = 0,
    Subscribe = 2,
    GetTree = 4,
}

/// Event kinds that can arrive on a subscribed socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Window,
    /// Anything we did not subscribe to or do not model
    Other(u32),
}

impl EventType {
    /// Name used in the `subscribe` payload
    pub fn name(self) -> Option<&'static str> {
        match self {
            EventType::Window => Some("window"),
            EventType::Other(_) => None,
        }
    }

    /// Map a raw message type (with the event bit set) to an event kind
    pub fn from_raw(raw: u32) -> Option<Self> {
        if raw & EVENT_MASK == 0 {
            return None;
        }
        Some(match raw & !EVENT_MASK {
            3 => EventType::Window,
            other => EventType::Other(other),
        })
    }
}

// ============================================================================
// Message Framing
// ============================================================================

/// A single framed message: header fields plus raw JSON payload
#[derive(Debug)]
pub struct FramedMessage {
    pub kind: u32,
    pub data: Vec<u8>,
}

impl FramedMessage {
    /// Create a request with a plain text payload (commands are not JSON)
    pub fn new(kind: MessageType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: kind as u32,
            data: payload.into(),
        }
    }

    /// Encode message with the i3-ipc header (lengths are native-endian)
    pub fn encode(&self) -> Vec<u8> {
        let len = self.data.len() as u32;
        let mut buf = Vec::with_capacity(HEADER_LEN + self.data.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&len.to_ne_bytes());
        buf.extend_from_slice(&self.kind.to_ne_bytes());
        buf.extend_from_slice(&self.data);
        buf
    }

    /// Parse a header, returning `(payload_len, kind)`
    pub fn decode_header(header: &[u8; HEADER_LEN]) -> Result<(usize, u32)> {
        if &header[..MAGIC.len()] != MAGIC {
            return Err(IpcError::BadMagic);
        }
        let mut word = [0u8; 4];
        word.copy_from_slice(&header[6..10]);
        let len = u32::from_ne_bytes(word) as usize;
        word.copy_from_slice(&header[10..14]);
        Ok((len, u32::from_ne_bytes(word)))
    }

    /// Deserialize the JSON payload
    pub fn json<'a, T: serde::Deserialize<'a>>(&'a self) -> Result<T> {
        Ok(serde_json::from_slice(&self.data)?)
    }
}
